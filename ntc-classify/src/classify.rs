//! Public classification API (spec.md §4.10): turns a dinucleotide-step [`Structure`]
//! plus a [`ClassificationContext`] into a [`ClassifiedStep`], end to end.
//!
//! Grounded on `original_source/src/classification.cpp`'s `LLKA_classifyStep()` and
//! `LLKA_classifyStepsMultiple()`, reassembled from the already-built pieces: nearest-
//! neighbour search ([`crate::nearest_neighbor`]), cluster voting
//! ([`crate::voting`]), confal scoring ([`crate::confal`]) and RMSD-to-closest-reference
//! ([`crate::rmsd`]). There is no `destroy_context`: [`ClassificationContext`] releases
//! its storage on `Drop`, the idiomatic Rust rendering of spec.md §5's resource-release
//! requirement (see `SPEC_FULL.md` §5 and `DESIGN.md`).

use crate::atom_filters::ArePhosphodiesterBonded;
use crate::calc::to_degrees_f;
use crate::classified_step::ClassifiedStep;
use crate::confal::{confal_score, ConfalScore, ConfalStatistics};
use crate::context::ClassificationContext;
use crate::error::ClassificationError;
use crate::nearest_neighbor::{find_nearest_neighbors, NearestNeighborSearch};
use crate::nomenclature::{Cana, NtC};
use crate::rmsd::rmsd_to_closest_ntc;
use crate::step_metrics::{measure_nu_angles, measure_step_metrics, step_residue_ids, StepMetrics};
use crate::structure::Structure;
use crate::tracing::{Tracepoint, Tracer};
use crate::violations::{TorsionViolationMask, Violations};
use crate::voting::vote_for_cluster;

/// The result of attempting to classify one step of a batch: `Ok` with the classified
/// step, or `Err` with why it could not be classified. The idiomatic Rust rendering of
/// spec.md §4.10's `{status, step}` pair.
pub type AttemptedStep = Result<ClassifiedStep, ClassificationError>;

fn distinct_non_sentinel_alt_ids(step: &Structure) -> Vec<char> {
    let mut ids: Vec<char> =
        step.atoms().iter().map(|a| a.alt_id).filter(|&c| c != crate::atom::NO_ALT_ID).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn validate_is_dinucleotide_step(step: &Structure) -> Result<(), ClassificationError> {
    let residues = step.residues();
    if residues.len() != 2 {
        return Err(ClassificationError::InvalidArgument);
    }
    let o3 = residues[0]
        .iter()
        .find(|a| a.auth_atom_name.trim() == "O3'")
        .ok_or(ClassificationError::InvalidArgument)?;
    let p = residues[1]
        .iter()
        .find(|a| a.auth_atom_name.trim() == "P")
        .ok_or(ClassificationError::InvalidArgument)?;
    if ArePhosphodiesterBonded::check_distance(o3, p).is_none() {
        return Err(ClassificationError::InvalidArgument);
    }
    Ok(())
}

fn torsion_violation_mask(step_torsions: &[f64; 9], reference: &[f64; 9], cutoff: f64) -> TorsionViolationMask {
    use crate::calc::angle_difference;
    let mut mask: TorsionViolationMask = 0;
    for i in 0..9 {
        if angle_difference(step_torsions[i], reference[i]).abs() > cutoff {
            mask |= 1 << i;
        }
    }
    mask
}

fn circular_mean(values: impl Iterator<Item = f64>) -> f64 {
    let (mut sin_sum, mut cos_sum, mut n) = (0.0, 0.0, 0usize);
    for v in values {
        sin_sum += v.sin();
        cos_sum += v.cos();
        n += 1;
    }
    if n == 0 {
        return 0.0;
    }
    crate::calc::wrap_to_2pi(sin_sum.atan2(cos_sum))
}

/// Classifies a single dinucleotide step against `ctx` (spec.md §4.10, §4.11).
///
/// Preconditions: `step` must contain exactly two residues connected by a phosphodiester
/// bond (else [`ClassificationError::InvalidArgument`]), and must not mix more than one
/// non-sentinel alternate location (else [`ClassificationError::MultipleAltIds`]).
pub fn classify_step(
    step: &Structure,
    ctx: &ClassificationContext,
    tracer: Option<&dyn Tracer>,
) -> Result<ClassifiedStep, ClassificationError> {
    if distinct_non_sentinel_alt_ids(step).len() > 1 {
        return Err(ClassificationError::MultipleAltIds);
    }
    validate_is_dinucleotide_step(step)?;

    let (residue_1, residue_2) = step_residue_ids(step)?;
    let metrics = measure_step_metrics(step)?;
    let (nu_1, nu_2) = measure_nu_angles(step)?;

    let limits = ctx.limits();
    let search = find_nearest_neighbors(&metrics, ctx, tracer)?;

    let mut violations = Violations::empty();
    if search.reject_delta {
        violations |= Violations::DELTA_TORSION_ANGLE_REJECTED;
    }
    let not_enough_neighbors = search.valid_count < limits.minimum_nearest_neighbors;
    if not_enough_neighbors {
        violations |= Violations::NOT_ENOUGH_NEAREST_NEIGHBORS;
    }

    let vote = if search.valid_count > 0 {
        vote_for_cluster(search.valid(), |golden_idx| ctx.golden_steps()[golden_idx].cluster_index)
    } else {
        None
    };

    let emergency_cluster_idx = ctx.golden_steps()[search.closest().golden_step_idx].cluster_index;
    let winner_idx = if not_enough_neighbors {
        // classification.cpp:718-721 overrides to the closest golden step's cluster
        // unconditionally whenever there aren't enough valid neighbours, before the
        // vote-count fallback is even considered.
        emergency_cluster_idx
    } else {
        match vote {
            Some(v) if v.total_votes >= limits.minimum_cluster_votes => v.cluster_idx,
            Some(_) => {
                violations |= Violations::BEST_CLUSTER_DOES_NOT_HAVE_ENOUGH_VOTES;
                emergency_cluster_idx
            }
            None => emergency_cluster_idx,
        }
    };
    let cluster = &ctx.clusters()[winner_idx];

    let mut violating_torsions_average: TorsionViolationMask = 0;
    let mut violating_torsions_nearest: TorsionViolationMask = 0;

    if search.valid_count > 0 {
        let step_torsions = metrics.torsions();

        let mut mean_torsions = [0.0; 9];
        for i in 0..9 {
            mean_torsions[i] =
                circular_mean(search.valid().iter().map(|n| step_torsions[i] - n.differences.torsions()[i]));
        }
        violating_torsions_average =
            torsion_violation_mask(&step_torsions, &mean_torsions, limits.average_neighbors_torsion_cutoff);
        if violating_torsions_average != 0 {
            violations |= Violations::AVG_NEIGHBOURS_TORSIONS_TOO_DIFFERENT;
        }

        let nearest = &search.valid()[0];
        let nearest_reference: [f64; 9] =
            std::array::from_fn(|i| step_torsions[i] - nearest.differences.torsions()[i]);
        violating_torsions_nearest =
            torsion_violation_mask(&step_torsions, &nearest_reference, limits.nearest_neighbor_torsions_cutoff);
        if violating_torsions_nearest != 0 {
            violations |= Violations::NEIGHBOUR_TORSIONS_TOO_DIFFERENT;
        }
    }

    let early_return = violations.intersects(
        Violations::AVG_NEIGHBOURS_TORSIONS_TOO_DIFFERENT | Violations::NEIGHBOUR_TORSIONS_TOO_DIFFERENT,
    );

    let differences_from_cluster_mean = {
        let diffs = cluster.torsion_differences(&metrics);
        StepMetrics {
            delta_1: diffs[0],
            epsilon_1: diffs[1],
            zeta_1: diffs[2],
            alpha_2: diffs[3],
            beta_2: diffs[4],
            gamma_2: diffs[5],
            delta_2: diffs[6],
            chi_1: diffs[7],
            chi_2: diffs[8],
            cc: metrics.cc - cluster.cc.mean,
            nn: metrics.nn - cluster.nn.mean,
            mu: crate::calc::angle_difference(metrics.mu, cluster.mu.mean),
        }
    };

    if !early_return {
        if metrics.cc < cluster.cc_interval.min {
            violations |= Violations::CC_TOO_LOW;
        } else if metrics.cc > cluster.cc_interval.max {
            violations |= Violations::CC_TOO_HIGH;
        }
        if metrics.nn < cluster.nn_interval.min {
            violations |= Violations::NN_TOO_LOW;
        } else if metrics.nn > cluster.nn_interval.max {
            violations |= Violations::NN_TOO_HIGH;
        }
        if crate::calc::angle_difference(metrics.mu, cluster.mu_interval.min) < 0.0 {
            violations |= Violations::MU_TOO_LOW;
        } else if crate::calc::angle_difference(metrics.mu, cluster.mu_interval.max) > 0.0 {
            violations |= Violations::MU_TOO_HIGH;
        }

        let backbone_diffs = differences_from_cluster_mean.torsions();
        let total_distance: f64 = backbone_diffs[..7].iter().sum();
        if total_distance.abs() > limits.total_distance_cutoff {
            violations |= Violations::TOTAL_DISTANCE_TOO_HIGH;
        }

        if crate::calc::angle_difference(nu_1.pseudorotation_phase, cluster.ribose_pseudorotation_1).abs()
            > limits.pseudorotation_cutoff
        {
            violations |= Violations::FIRST_PSEUDOROTATION_TOO_DIFFERENT;
            if let Some(t) = tracer {
                t.emit(Tracepoint::PseudorotationTooDifferent, "nucleotide 1");
            }
        }
        if crate::calc::angle_difference(nu_2.pseudorotation_phase, cluster.ribose_pseudorotation_2).abs()
            > limits.pseudorotation_cutoff
        {
            violations |= Violations::SECOND_PSEUDOROTATION_TOO_DIFFERENT;
            if let Some(t) = tracer {
                t.emit(Tracepoint::PseudorotationTooDifferent, "nucleotide 2");
            }
        }
    }

    let rmsd_to_closest_ntc = rmsd_to_closest_ntc(&metrics, cluster)?;

    if !violations.is_ok() && rmsd_to_closest_ntc <= limits.max_close_enough_rmsd {
        violations |= Violations::UNASSIGNED_BUT_CLOSE_ENOUGH;
    }

    let (assigned_ntc, assigned_cana) =
        if violations.is_ok() { (cluster.ntc, cluster.cana) } else { (NtC::Invalid, Cana::Invalid) };

    let closest_golden_step_idx = search.closest().golden_step_idx;
    let closest_golden_step = ctx.golden_steps()[closest_golden_step_idx].clone();
    if let Some(t) = tracer {
        t.emit(Tracepoint::ClosestGoldenStepInfo, &closest_golden_step.name);
        t.emit(
            Tracepoint::BestieClusterInfo,
            &format!("cluster {} ({})", cluster.cluster_number, cluster.ntc.name()),
        );
    }

    // classification.cpp:733-739: computed against the winning cluster's own
    // per-nucleotide ν-angle means (angleDifference), not the closest golden step.
    let nu_differences_1: [f64; 5] =
        std::array::from_fn(|i| crate::calc::angle_difference(nu_1.nu[i], cluster.nus_first[i].mean));
    let nu_differences_2: [f64; 5] =
        std::array::from_fn(|i| crate::calc::angle_difference(nu_2.nu[i], cluster.nus_second[i].mean));

    let confal = ctx.confal(winner_idx).ok_or(ClassificationError::InvalidArgument)?;
    let degree_differences = StepMetrics {
        delta_1: to_degrees_f(differences_from_cluster_mean.delta_1),
        epsilon_1: to_degrees_f(differences_from_cluster_mean.epsilon_1),
        zeta_1: to_degrees_f(differences_from_cluster_mean.zeta_1),
        alpha_2: to_degrees_f(differences_from_cluster_mean.alpha_2),
        beta_2: to_degrees_f(differences_from_cluster_mean.beta_2),
        gamma_2: to_degrees_f(differences_from_cluster_mean.gamma_2),
        delta_2: to_degrees_f(differences_from_cluster_mean.delta_2),
        chi_1: to_degrees_f(differences_from_cluster_mean.chi_1),
        chi_2: to_degrees_f(differences_from_cluster_mean.chi_2),
        cc: differences_from_cluster_mean.cc,
        nn: differences_from_cluster_mean.nn,
        mu: to_degrees_f(differences_from_cluster_mean.mu),
    };
    let ConfalScore { total: confal_total, .. } = confal_score(&degree_differences, confal, violations);

    Ok(ClassifiedStep {
        residue_1,
        residue_2,
        assigned_ntc,
        assigned_cana,
        closest_ntc: cluster.ntc,
        closest_cana: cluster.cana,
        measured_metrics: metrics,
        differences_from_cluster_mean,
        nu_1,
        nu_2,
        nu_differences_1,
        nu_differences_2,
        rmsd_to_closest_ntc,
        closest_golden_step: closest_golden_step.name,
        confal_score: confal_total,
        violations,
        violating_torsions_average,
        violating_torsions_nearest,
    })
}

/// Classifies every step in `steps` against `ctx`, preserving input order (spec.md §4.10,
/// §5's ordering guarantee). An empty `steps` is [`ClassificationError::NothingToClassify`].
pub fn classify_steps(
    steps: &[Structure],
    ctx: &ClassificationContext,
    tracer: Option<&dyn Tracer>,
) -> Result<Vec<AttemptedStep>, ClassificationError> {
    if steps.is_empty() {
        return Err(ClassificationError::NothingToClassify);
    }
    if let Some(t) = tracer {
        t.emit(Tracepoint::BeginStepClassificationMultiple, &format!("{} steps", steps.len()));
    }
    Ok(steps.iter().map(|step| classify_step(step, ctx, tracer)).collect())
}

/// Mean confal score and its percentile rank over a batch of already-classified steps
/// (spec.md §4.10). `{score: 0, percentile: 0}` for an empty batch.
pub fn average_confal(steps: &[ClassifiedStep], ctx: &ClassificationContext) -> ConfalStatistics {
    if steps.is_empty() {
        return ConfalStatistics { score: 0.0, percentile: 0 };
    }
    let scores: Vec<f64> = steps.iter().map(|s| s.confal_score).collect();
    let score = crate::confal::average_confal_score(&scores);
    let percentile = crate::confal::confal_percentile(score, ctx).max(0);
    ConfalStatistics { score, percentile }
}

/// Like [`average_confal`] but over a batch of [`AttemptedStep`]s, ignoring failures. If
/// every attempt failed (or the batch is empty), `{score: 0, percentile: 0}`.
pub fn average_confal_attempted(attempted: &[AttemptedStep], ctx: &ClassificationContext) -> ConfalStatistics {
    let steps: Vec<ClassifiedStep> = attempted.iter().filter_map(|a| a.as_ref().ok().cloned()).collect();
    average_confal(&steps, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::{Atom, NO_ALT_ID, NO_INS_CODE};
    use crate::calc::{to_radians_f, Vec3};
    use crate::context::{
        ClassificationLimits, ClusterNuAnglesRow, ClusterRow, ConfalRow, GoldenStepRow,
        CONFAL_PERCENTILE_COUNT,
    };

    fn limits() -> ClassificationLimits {
        ClassificationLimits {
            average_neighbors_torsion_cutoff: to_radians_f(40.0),
            nearest_neighbor_torsions_cutoff: to_radians_f(40.0),
            total_distance_cutoff: to_radians_f(80.0),
            pseudorotation_cutoff: to_radians_f(60.0),
            minimum_cluster_votes: 0.0001,
            minimum_nearest_neighbors: 1,
            number_of_used_nearest_neighbors: 3,
            max_close_enough_rmsd: 5.0,
        }
    }

    fn cluster_row(cluster_number: i32, ntc: &str) -> ClusterRow {
        ClusterRow {
            cluster_number,
            ntc: ntc.to_string(),
            cana: "A".to_string(),
            delta_1_deviation: 15.0, delta_1_meanValue: 80.0,
            epsilon_1_deviation: 15.0, epsilon_1_meanValue: -150.0,
            zeta_1_deviation: 15.0, zeta_1_meanValue: -70.0,
            alpha_2_deviation: 15.0, alpha_2_meanValue: -65.0,
            beta_2_deviation: 15.0, beta_2_meanValue: 175.0,
            gamma_2_deviation: 15.0, gamma_2_meanValue: 55.0,
            delta_2_deviation: 15.0, delta_2_meanValue: 80.0,
            chi_1_deviation: 15.0, chi_1_meanValue: -160.0,
            chi_2_deviation: 15.0, chi_2_meanValue: -160.0,
            cc_deviation: 0.8, cc_mean_value: 4.8,
            nn_deviation: 0.8, nn_mean_value: 4.6,
            mu_deviation: 15.0, mu_meanValue: 0.0,
            ribose_pseudorotation_1: 10.0,
            ribose_pseudorotation_2: 10.0,
        }
    }

    fn golden_step_row(cluster_number: i32, name: &str) -> GoldenStepRow {
        GoldenStepRow {
            cluster_number,
            delta_1: 80.0, epsilon_1: -150.0, zeta_1: -70.0, alpha_2: -65.0, beta_2: 175.0,
            gamma_2: 55.0, delta_2: 80.0, chi_1: -160.0, chi_2: -160.0,
            cc: 4.8, nn: 4.6, mu: 0.0,
            name: name.to_string(),
            pucker_1: "C3endo".to_string(),
            pucker_2: "C3endo".to_string(),
            nu0_1: 10.0, nu1_1: 10.0, nu2_1: 10.0, nu3_1: 10.0, nu4_1: 10.0,
            nu0_2: 10.0, nu1_2: 10.0, nu2_2: 10.0, nu3_2: 10.0, nu4_2: 10.0,
        }
    }

    fn confal_row(cluster_number: i32) -> ConfalRow {
        ConfalRow {
            cluster_number,
            delta_1: 10.0, epsilon_1: 10.0, zeta_1: 10.0, alpha_2: 10.0, beta_2: 10.0, gamma_2: 10.0,
            delta_2: 10.0, chi_1: 10.0, chi_2: 10.0, cc: 0.5, nn: 0.5, mu: 10.0,
            nu0_1: 5.0, nu1_1: 5.0, nu2_1: 5.0, nu3_1: 5.0, nu4_1: 5.0,
            nu0_2: 5.0, nu1_2: 5.0, nu2_2: 5.0, nu3_2: 5.0, nu4_2: 5.0,
        }
    }

    fn nu_angles_row(cluster_number: i32) -> ClusterNuAnglesRow {
        ClusterNuAnglesRow {
            cluster_number,
            nu0_1_meanValue: 10.0, nu0_1_deviation: 2.0,
            nu1_1_meanValue: 10.0, nu1_1_deviation: 2.0,
            nu2_1_meanValue: 10.0, nu2_1_deviation: 2.0,
            nu3_1_meanValue: 10.0, nu3_1_deviation: 2.0,
            nu4_1_meanValue: 10.0, nu4_1_deviation: 2.0,
            nu0_2_meanValue: 10.0, nu0_2_deviation: 2.0,
            nu1_2_meanValue: 10.0, nu1_2_deviation: 2.0,
            nu2_2_meanValue: 10.0, nu2_2_deviation: 2.0,
            nu3_2_meanValue: 10.0, nu3_2_deviation: 2.0,
            nu4_2_meanValue: 10.0, nu4_2_deviation: 2.0,
        }
    }

    fn sample_ctx() -> ClassificationContext {
        ClassificationContext::new(
            vec![cluster_row(1, "AA00")],
            vec![golden_step_row(1, "golden-1")],
            vec![confal_row(1)],
            vec![nu_angles_row(1)],
            vec![0.0; CONFAL_PERCENTILE_COUNT],
            limits(),
        )
        .unwrap()
    }

    /// A complete, geometrically arbitrary dinucleotide step used to exercise the full
    /// classification pipeline end to end.
    fn sample_step() -> Structure {
        let names_1 = [
            ("C5'", Vec3::new(0.0, 0.0, 0.0)),
            ("C4'", Vec3::new(1.5, 0.0, 0.0)),
            ("O4'", Vec3::new(2.0, 1.3, 0.3)),
            ("C3'", Vec3::new(2.3, -1.0, 0.4)),
            ("C2'", Vec3::new(3.0, -0.7, 1.6)),
            ("C1'", Vec3::new(3.2, 0.8, 1.4)),
            ("O3'", Vec3::new(3.5, -1.8, -0.5)),
            ("N9", Vec3::new(4.4, 1.2, 1.9)),
            ("C4", Vec3::new(5.6, 0.6, 2.0)),
        ];
        let names_2 = [
            ("P", Vec3::new(4.9, -1.4, -0.3)),
            ("O5'", Vec3::new(5.6, -0.2, -1.0)),
            ("C5'", Vec3::new(7.0, -0.1, -1.2)),
            ("C4'", Vec3::new(7.6, 1.2, -1.8)),
            ("O4'", Vec3::new(7.2, 2.3, -1.0)),
            ("C3'", Vec3::new(9.1, 1.1, -1.9)),
            ("C2'", Vec3::new(9.4, 1.9, -0.6)),
            ("C1'", Vec3::new(8.2, 2.7, -0.2)),
            ("O3'", Vec3::new(9.7, -0.2, -2.1)),
            ("N9", Vec3::new(8.1, 4.1, -0.6)),
            ("C4", Vec3::new(9.0, 5.0, -0.3)),
        ];

        let mut step = Structure::new();
        for (name, pos) in names_1 {
            let mut a = Atom::new("C", name, "A", "DA", 1, NO_INS_CODE, 1, NO_ALT_ID, pos);
            a.label_seq_id = 1;
            step.push_atom(a);
        }
        for (name, pos) in names_2 {
            let mut a = Atom::new("C", name, "A", "DG", 2, NO_INS_CODE, 1, NO_ALT_ID, pos);
            a.label_seq_id = 2;
            step.push_atom(a);
        }
        step
    }

    #[test]
    fn classifies_a_complete_step_without_error() {
        let ctx = sample_ctx();
        let step = sample_step();
        let classified = classify_step(&step, &ctx, None).expect("complete step should classify");
        assert!(classified.rmsd_to_closest_ntc.is_finite());
        assert_eq!(classified.closest_ntc, NtC::AA00);
    }

    #[test]
    fn non_dinucleotide_structure_is_rejected() {
        let ctx = sample_ctx();
        let mut step = sample_step();
        step.atoms_mut().retain(|a| a.auth_seq_id == 1);
        assert!(matches!(classify_step(&step, &ctx, None), Err(ClassificationError::InvalidArgument)));
    }

    #[test]
    fn multiple_alt_ids_are_rejected() {
        let ctx = sample_ctx();
        let mut step = sample_step();
        for (i, a) in step.atoms_mut().iter_mut().enumerate() {
            a.alt_id = if i % 2 == 0 { 'A' } else { 'B' };
        }
        assert!(matches!(classify_step(&step, &ctx, None), Err(ClassificationError::MultipleAltIds)));
    }

    #[test]
    fn empty_batch_is_nothing_to_classify() {
        let ctx = sample_ctx();
        assert!(matches!(classify_steps(&[], &ctx, None), Err(ClassificationError::NothingToClassify)));
    }

    #[test]
    fn batch_preserves_input_order() {
        let ctx = sample_ctx();
        let steps = vec![sample_step(), sample_step()];
        let results = classify_steps(&steps, &ctx, None).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
    }

    #[test]
    fn average_confal_of_empty_batch_is_zero() {
        let ctx = sample_ctx();
        let stats = average_confal(&[], &ctx);
        assert_eq!(stats.score, 0.0);
        assert_eq!(stats.percentile, 0);
    }
}
