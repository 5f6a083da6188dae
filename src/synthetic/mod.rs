//! Seeded synthetic cohorts for demos and benchmarks

use std::ops::Range;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::render::RenderRequest;
use crate::series::Series;

/// Series produced by [`CohortGenerator`], in declaration order
pub const COHORT_SERIES: [&str; 4] = ["Participation Total", "Quiz Total", "Final", "Total"];

/// Share of the cohort in the high tier
const HIGH_SHARE: f64 = 0.05;
/// Share of the cohort in the middle tier; the rest is low
const MIDDLE_SHARE: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    High,
    Middle,
    Low,
}

impl Tier {
    /// Score ranges `(participation, quiz, final)`, upper bound exclusive
    fn ranges(self) -> (Range<u32>, Range<u32>, Range<u32>) {
        match self {
            Tier::High => (18..21, 18..21, 220..301),
            Tier::Middle => (10..19, 10..19, 130..190),
            Tier::Low => (5..13, 5..13, 40..100),
        }
    }
}

/// Generates a tri-modal cohort of student scores
///
/// The same seed and size always give the same cohort.
///
/// # Example
///
/// ```
/// use violin_swarm::CohortGenerator;
///
/// let series = CohortGenerator::new(7).generate(20).unwrap();
/// assert_eq!(series.len(), 4);
/// assert!(series.iter().all(|s| s.len() == 20));
/// ```
#[derive(Debug, Clone)]
pub struct CohortGenerator {
    seed: u64,
}

impl Default for CohortGenerator {
    fn default() -> Self {
        CohortGenerator::new(42)
    }
}

impl CohortGenerator {
    pub fn new(seed: u64) -> Self {
        CohortGenerator { seed }
    }

    /// Scores for `students` students, one series per [`COHORT_SERIES`] entry
    ///
    /// Ids are `S001`, `S002`, ... in the order students were generated.
    pub fn generate(&self, students: usize) -> Result<Vec<Series>> {
        if students == 0 {
            return Err(Error::MalformedInput(
                "a cohort needs at least one student".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let tiers = assign_tiers(students, &mut rng);

        let mut series: Vec<Series> = COHORT_SERIES.iter().map(|name| Series::new(*name)).collect();
        for (index, tier) in tiers.into_iter().enumerate() {
            let id = format!("S{:03}", index + 1);
            let (participation, quiz, final_exam) = tier.ranges();
            let participation = f64::from(rng.random_range(participation));
            let quiz = f64::from(rng.random_range(quiz));
            let final_exam = f64::from(rng.random_range(final_exam));
            let total = participation + quiz + final_exam;

            for (target, value) in series.iter_mut().zip([participation, quiz, final_exam, total]) {
                target.push(id.clone(), value);
            }
        }
        Ok(series)
    }

    /// A ready-to-render request over a generated cohort
    pub fn request(&self, students: usize) -> Result<RenderRequest> {
        Ok(RenderRequest::new(self.generate(students)?))
    }
}

/// Tier of every student, shuffled
fn assign_tiers(count: usize, rng: &mut StdRng) -> Vec<Tier> {
    let high = (count as f64 * HIGH_SHARE) as usize;
    let middle = (count as f64 * MIDDLE_SHARE) as usize;
    let low = count - high - middle;

    let mut tiers = Vec::with_capacity(count);
    tiers.extend(std::iter::repeat(Tier::High).take(high));
    tiers.extend(std::iter::repeat(Tier::Middle).take(middle));
    tiers.extend(std::iter::repeat(Tier::Low).take(low));
    tiers.shuffle(rng);
    tiers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_counts() {
        let mut rng = StdRng::seed_from_u64(1);
        let tiers = assign_tiers(100, &mut rng);
        assert_eq!(tiers.iter().filter(|t| **t == Tier::High).count(), 5);
        assert_eq!(tiers.iter().filter(|t| **t == Tier::Middle).count(), 75);
        assert_eq!(tiers.iter().filter(|t| **t == Tier::Low).count(), 20);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = CohortGenerator::new(42).generate(50).unwrap();
        let b = CohortGenerator::new(42).generate(50).unwrap();
        assert_eq!(a, b);

        let c = CohortGenerator::new(43).generate(50).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_totals_add_up() {
        let series = CohortGenerator::default().generate(30).unwrap();
        let names: Vec<_> = series.iter().map(|s| s.name()).collect();
        assert_eq!(names, COHORT_SERIES.to_vec());

        let columns: Vec<Vec<(&str, f64)>> = series.iter().map(|s| s.scores().collect()).collect();
        for i in 0..30 {
            let (id, participation) = columns[0][i];
            assert_eq!(id, format!("S{:03}", i + 1));
            let sum = participation + columns[1][i].1 + columns[2][i].1;
            assert_eq!(columns[3][i].1, sum);
            assert!((5.0..=20.0).contains(&participation));
        }
    }

    #[test]
    fn test_empty_cohort_rejected() {
        assert!(CohortGenerator::new(1).generate(0).is_err());
    }
}
