use abundance_stats::testing::TTestType;
use abundance_stats::testing::correction::benjamini_hochberg_correction;
use abundance_stats::testing::effect::{cohens_d, log2_fold_change};
use abundance_stats::testing::inference::parametric::{t_test, t_test_from_sums};
use approx::assert_relative_eq;

#[test]
fn clear_group_difference_from_sums() {
    // Group 1: [1, 2, 3], Group 2: [7, 8, 9]
    let result = t_test_from_sums(6.0, 14.0, 3.0, 24.0, 194.0, 3.0, TTestType::Student);
    assert!(result.p_value < 0.05);
    assert!(result.statistic.abs() > 2.0);
}

#[test]
fn identical_group_sums_are_degenerate() {
    // [5, 5, 5] vs [5, 5, 5]: no variance on either side, statistics are
    // undefined rather than "not significant".
    let result = t_test_from_sums(15.0, 75.0, 3.0, 15.0, 75.0, 3.0, TTestType::Student);
    assert!(result.statistic.is_nan());
    assert!(result.p_value.is_nan());
}

#[test]
fn abundant_vs_near_absent_protein() {
    // [5, 4, 6, 5, 5] vs [0, 0, 0, 0, 0]: the zero group has zero variance
    // but the abundant group carries enough for a Welch test.
    let result = t_test_from_sums(25.0, 127.0, 5.0, 0.0, 0.0, 5.0, TTestType::Welch);
    assert!(result.p_value < 0.001);
    assert!(result.statistic > 3.0);
}

#[test]
fn unequal_replicate_counts() {
    let small = [6.0, 7.0, 8.0];
    let large = [4.6, 5.0, 5.4, 4.8, 5.2, 5.0, 4.9, 5.1, 5.3, 4.7];
    let result = t_test(&small, &large, TTestType::Welch);
    assert!(result.p_value < 0.1);
}

#[test]
fn same_means_high_variance_not_significant() {
    let x = [1.0, 10.0, 2.0, 9.0, 3.0];
    let y = [2.0, 8.0, 4.0, 7.0, 4.0];
    let result = t_test(&x, &y, TTestType::Student);
    assert!(result.p_value > 0.1);
    assert!(result.statistic.abs() < 1.0);
}

#[test]
fn minimal_replicate_count_still_defined() {
    let result = t_test(&[5.0, 7.0], &[3.0, 5.0], TTestType::Student);
    assert!(result.statistic.is_finite());
    assert!(result.p_value.is_finite());
}

#[test]
fn student_and_welch_agree_for_balanced_equal_variance() {
    let x = [2.1, 2.3, 1.9, 2.2, 2.0];
    let y = [2.8, 3.0, 2.6, 2.9, 2.7];
    let student = t_test(&x, &y, TTestType::Student);
    let welch = t_test(&x, &y, TTestType::Welch);
    assert_relative_eq!(student.statistic, welch.statistic, epsilon = 1e-9);
    assert_relative_eq!(student.p_value, welch.p_value, max_relative = 1e-6);
}

#[test]
fn bh_worked_example() {
    // Raw p-values [0.01, 0.04, 0.20] over 3 tests:
    //   rank 3: 0.20 * 3/3 = 0.20
    //   rank 2: min(0.20, 0.04 * 3/2) = 0.06
    //   rank 1: min(0.06, 0.01 * 3/1) = 0.03
    let adjusted = benjamini_hochberg_correction(&[0.01, 0.04, 0.20]).unwrap();
    assert_relative_eq!(adjusted[0], 0.03, epsilon = 1e-12);
    assert_relative_eq!(adjusted[1], 0.06, epsilon = 1e-12);
    assert_relative_eq!(adjusted[2], 0.20, epsilon = 1e-12);
}

#[test]
fn effect_sizes_match_hand_computation() {
    let treatment = [8.0, 7.5, 8.5];
    let control = [2.0, 2.2, 1.8];

    // log2(24 / 6) = 2
    assert_relative_eq!(log2_fold_change(&treatment, &control), 2.0, epsilon = 1e-12);

    // means 8 and 2, variances 0.25 and 0.04:
    // d = 6 / sqrt(0.145)
    assert_relative_eq!(
        cohens_d(&treatment, &control),
        6.0 / 0.145_f64.sqrt(),
        epsilon = 1e-9
    );
}
