//! Puzzle representation types: capacities, configurations, moves and goals.
//!
//! All types serialize to plain JSON so a caller can hand a whole problem
//! to the solver as a single document, e.g.
//! `{"capacities": [3, 5], "target": 4}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::PuzzleError;

/// Index of a container within a capacity list
pub type ContainerId = usize;

/// Amount of water, in whole units
pub type Volume = u32;

/// Most puzzles use two to four containers; keep those inline.
type Volumes = SmallVec<[Volume; 4]>;

/// A single atomic operation on the containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Move {
    Fill { container: ContainerId },
    Empty { container: ContainerId },
    Pour { from: ContainerId, to: ContainerId },
}

impl Move {
    pub fn fill(container: ContainerId) -> Self {
        Move::Fill { container }
    }

    pub fn empty(container: ContainerId) -> Self {
        Move::Empty { container }
    }

    pub fn pour(from: ContainerId, to: ContainerId) -> Self {
        Move::Pour { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Fill { container } => write!(f, "Fill({})", container),
            Move::Empty { container } => write!(f, "Empty({})", container),
            Move::Pour { from, to } => write!(f, "Pour({}->{})", from, to),
        }
    }
}

/// Container capacities, fixed for the lifetime of a problem.
///
/// Always non-empty and strictly positive; the constructor rejects anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Volume>", into = "Vec<Volume>")]
pub struct Capacities(Volumes);

impl Capacities {
    pub fn new(capacities: impl IntoIterator<Item = Volume>) -> Result<Self, PuzzleError> {
        let capacities: Volumes = capacities.into_iter().collect();

        if capacities.is_empty() {
            return Err(PuzzleError::InvalidCapacities(
                "at least one container is required".to_string(),
            ));
        }
        if let Some(index) = capacities.iter().position(|&c| c == 0) {
            return Err(PuzzleError::InvalidCapacities(format!(
                "container {} has zero capacity",
                index
            )));
        }

        Ok(Self(capacities))
    }

    pub fn as_slice(&self) -> &[Volume] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, container: ContainerId) -> Option<Volume> {
        self.0.get(container).copied()
    }

    /// The largest single capacity
    pub fn max(&self) -> Volume {
        self.0.iter().copied().max().unwrap_or(0)
    }
}

impl TryFrom<Vec<Volume>> for Capacities {
    type Error = PuzzleError;

    fn try_from(value: Vec<Volume>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Capacities> for Vec<Volume> {
    fn from(value: Capacities) -> Self {
        value.0.into_vec()
    }
}

impl FromStr for Capacities {
    type Err = PuzzleError;

    /// Parse a comma-separated capacity list such as `"3, 5"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut capacities = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let value = parse_integer(part)?;
            if value <= 0 {
                return Err(PuzzleError::InvalidCapacities(format!(
                    "capacity {} must be positive",
                    value
                )));
            }
            let value = Volume::try_from(value).map_err(|_| {
                PuzzleError::InvalidCapacities(format!("capacity {} is too large", value))
            })?;
            capacities.push(value);
        }
        Self::new(capacities)
    }
}

/// Parse a target volume from text, rejecting negative numbers.
pub fn parse_target(s: &str) -> Result<Volume, PuzzleError> {
    let value = parse_integer(s.trim())?;
    if value < 0 {
        return Err(PuzzleError::InvalidTarget(format!(
            "{} is negative",
            value
        )));
    }
    Volume::try_from(value)
        .map_err(|_| PuzzleError::InvalidTarget(format!("{} is too large", value)))
}

fn parse_integer(s: &str) -> Result<i64, PuzzleError> {
    s.parse::<i64>().map_err(|e| PuzzleError::Parse {
        input: s.to_string(),
        reason: e.to_string(),
    })
}

/// Snapshot of the current volume in every container.
///
/// Equality is element-wise, which is what the solver uses to deduplicate
/// visited configurations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Configuration {
    volumes: Volumes,
}

impl Configuration {
    pub fn new(volumes: impl IntoIterator<Item = Volume>) -> Self {
        Self {
            volumes: volumes.into_iter().collect(),
        }
    }

    /// All containers empty
    pub fn zeros(len: usize) -> Self {
        Self {
            volumes: SmallVec::from_elem(0, len),
        }
    }

    pub fn volumes(&self) -> &[Volume] {
        &self.volumes
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn get(&self, container: ContainerId) -> Option<Volume> {
        self.volumes.get(container).copied()
    }

    /// Check if any container currently holds exactly `volume`
    pub fn holds(&self, volume: Volume) -> bool {
        self.volumes.contains(&volume)
    }

    /// Clone with a different volume in one container
    pub(crate) fn with_volume(&self, container: ContainerId, volume: Volume) -> Self {
        let mut next = self.clone();
        next.volumes[container] = volume;
        next
    }

    /// Verify this configuration fits the given capacities
    pub fn check_fits(&self, capacities: &Capacities) -> Result<(), PuzzleError> {
        if self.len() != capacities.len() {
            return Err(PuzzleError::InvalidConfiguration(format!(
                "expected {} containers, found {}",
                capacities.len(),
                self.len()
            )));
        }
        for (index, (&volume, &capacity)) in
            self.volumes.iter().zip(capacities.as_slice()).enumerate()
        {
            if volume > capacity {
                return Err(PuzzleError::InvalidConfiguration(format!(
                    "container {} holds {} but its capacity is {}",
                    index, volume, capacity
                )));
            }
        }
        Ok(())
    }

    /// Display adapter rendering `current/capacity` pairs, e.g. `4/5, 0/3`
    pub fn glasses<'a>(&'a self, capacities: &'a Capacities) -> Glasses<'a> {
        Glasses {
            configuration: self,
            capacities,
        }
    }
}

/// See [`Configuration::glasses`].
pub struct Glasses<'a> {
    configuration: &'a Configuration,
    capacities: &'a Capacities,
}

impl fmt::Display for Glasses<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (current, capacity)) in self
            .configuration
            .volumes()
            .iter()
            .zip(self.capacities.as_slice())
            .enumerate()
        {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}/{}", current, capacity)?;
        }
        Ok(())
    }
}

/// Parse glass notation such as `"12/12, 0/8, 0/5"` into capacities and volumes.
pub fn parse_glasses(s: &str) -> Result<(Capacities, Configuration), PuzzleError> {
    let mut capacities = Vec::new();
    let mut volumes = Vec::new();

    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (current, capacity) = part.split_once('/').ok_or_else(|| PuzzleError::Parse {
            input: part.to_string(),
            reason: "expected 'current/capacity', e.g. '2/5'".to_string(),
        })?;
        let capacity: Capacities = capacity.parse()?;
        let current = parse_integer(current.trim())?;
        let current = Volume::try_from(current).map_err(|_| {
            PuzzleError::InvalidConfiguration(format!("volume {} is out of range", current))
        })?;
        capacities.push(capacity.as_slice()[0]);
        volumes.push(current);
    }

    let capacities = Capacities::new(capacities)?;
    let configuration = Configuration::new(volumes);
    configuration.check_fits(&capacities)?;
    Ok((capacities, configuration))
}

/// What the search is looking for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Goal {
    /// Any container holds exactly this volume
    Volume(Volume),
    /// Every container matches this configuration exactly
    Configuration(Configuration),
}

impl Goal {
    pub fn is_satisfied(&self, configuration: &Configuration) -> bool {
        match self {
            Goal::Volume(target) => configuration.holds(*target),
            Goal::Configuration(expected) => configuration == expected,
        }
    }
}

/// The complete problem handed to the solver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub capacities: Capacities,
    /// Starting volumes; all containers empty when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Configuration>,
    #[serde(alias = "target")]
    pub goal: Goal,
}

impl Problem {
    pub fn new(capacities: Capacities, goal: Goal) -> Self {
        Self {
            capacities,
            start: None,
            goal,
        }
    }

    pub fn with_target(capacities: Capacities, target: Volume) -> Self {
        Self::new(capacities, Goal::Volume(target))
    }

    pub fn with_start(mut self, start: Configuration) -> Self {
        self.start = Some(start);
        self
    }

    /// Build a problem from two glass notations, e.g. `"0/5, 0/3"` to `"4/5, 0/3"`
    pub fn from_glasses(from: &str, to: &str) -> Result<Self, PuzzleError> {
        let (capacities, start) = parse_glasses(from)?;
        let (goal_capacities, goal) = parse_glasses(to)?;

        if capacities.len() != goal_capacities.len() {
            return Err(PuzzleError::InvalidConfiguration(
                "start and goal should have the same number of glasses".to_string(),
            ));
        }
        if capacities != goal_capacities {
            return Err(PuzzleError::InvalidConfiguration(
                "start and goal should have the same capacity for every glass".to_string(),
            ));
        }

        Ok(Self::new(capacities, Goal::Configuration(goal)).with_start(start))
    }

    pub fn start_configuration(&self) -> Configuration {
        self.start
            .clone()
            .unwrap_or_else(|| Configuration::zeros(self.capacities.len()))
    }

    /// Check the start and goal against the capacities
    pub fn validate(&self) -> Result<(), PuzzleError> {
        if let Some(start) = &self.start {
            start.check_fits(&self.capacities)?;
        }
        if let Goal::Configuration(goal) = &self.goal {
            goal.check_fits(&self.capacities)?;
        }
        Ok(())
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start_configuration();
        write!(f, "{} -> ", start.glasses(&self.capacities))?;
        match &self.goal {
            Goal::Volume(target) => write!(f, "any glass holding {}", target),
            Goal::Configuration(goal) => write!(f, "{}", goal.glasses(&self.capacities)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caps(values: &[Volume]) -> Capacities {
        Capacities::new(values.iter().copied()).unwrap()
    }

    #[test]
    fn test_capacities_reject_empty_and_zero() {
        assert!(matches!(
            Capacities::new([]),
            Err(PuzzleError::InvalidCapacities(_))
        ));
        assert!(matches!(
            Capacities::new([3, 0, 5]),
            Err(PuzzleError::InvalidCapacities(_))
        ));
    }

    #[test]
    fn test_capacities_from_str() {
        let parsed: Capacities = "3, 5,8".parse().unwrap();
        assert_eq!(parsed.as_slice(), &[3, 5, 8]);
        assert_eq!(parsed.max(), 8);

        assert!(matches!(
            "3, -5".parse::<Capacities>(),
            Err(PuzzleError::InvalidCapacities(_))
        ));
        assert!(matches!(
            "3, five".parse::<Capacities>(),
            Err(PuzzleError::Parse { .. })
        ));
        assert!(matches!(
            " , ".parse::<Capacities>(),
            Err(PuzzleError::InvalidCapacities(_))
        ));
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(" 4 "), Ok(4));
        assert_eq!(parse_target("0"), Ok(0));
        assert!(matches!(parse_target("-1"), Err(PuzzleError::InvalidTarget(_))));
        assert!(matches!(parse_target("four"), Err(PuzzleError::Parse { .. })));
    }

    #[test]
    fn test_move_display() {
        assert_eq!(Move::fill(0).to_string(), "Fill(0)");
        assert_eq!(Move::empty(1).to_string(), "Empty(1)");
        assert_eq!(Move::pour(0, 2).to_string(), "Pour(0->2)");
    }

    #[test]
    fn test_move_json_shape() {
        let json = serde_json::to_string(&Move::pour(1, 0)).unwrap();
        assert_eq!(json, r#"{"kind":"pour","from":1,"to":0}"#);

        let fill: Move = serde_json::from_str(r#"{"kind":"fill","container":2}"#).unwrap();
        assert_eq!(fill, Move::fill(2));
    }

    #[test]
    fn test_configuration_holds_and_fits() {
        let capacities = caps(&[3, 5]);
        let configuration = Configuration::new([3, 4]);

        assert!(configuration.holds(4));
        assert!(!configuration.holds(2));
        assert!(configuration.check_fits(&capacities).is_ok());

        assert!(Configuration::new([4, 0]).check_fits(&capacities).is_err());
        assert!(Configuration::new([0]).check_fits(&capacities).is_err());
    }

    #[test]
    fn test_parse_glasses_and_display() {
        let (capacities, configuration) = parse_glasses("4/7, 3/5, 0/2").unwrap();

        assert_eq!(capacities.as_slice(), &[7, 5, 2]);
        assert_eq!(configuration.volumes(), &[4, 3, 0]);
        assert_eq!(
            configuration.glasses(&capacities).to_string(),
            "4/7, 3/5, 0/2"
        );
    }

    #[test]
    fn test_parse_glasses_rejects_bad_input() {
        assert!(parse_glasses("4/7, 3/a, 0/2").is_err());
        assert!(parse_glasses("4/70/2").is_err());
        assert!(parse_glasses("plop").is_err());
        assert!(matches!(
            parse_glasses("11/10"),
            Err(PuzzleError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            parse_glasses("0/0"),
            Err(PuzzleError::InvalidCapacities(_))
        ));
    }

    #[test]
    fn test_problem_from_glasses_requires_matching_capacities() {
        let problem = Problem::from_glasses("0/5, 0/3", "4/5, 0/3").unwrap();
        assert_eq!(problem.start, Some(Configuration::new([0, 0])));
        assert_eq!(problem.goal, Goal::Configuration(Configuration::new([4, 0])));

        assert!(Problem::from_glasses("0/8, 0/4, 0/2", "0/4, 0/2").is_err());
        assert!(Problem::from_glasses("0/8, 0/4", "0/8, 0/5").is_err());
    }

    #[test]
    fn test_problem_json_accepts_target_alias() {
        let problem: Problem =
            serde_json::from_str(r#"{"capacities": [3, 5], "target": 4}"#).unwrap();
        assert_eq!(problem, Problem::with_target(caps(&[3, 5]), 4));

        let problem: Problem = serde_json::from_str(
            r#"{"capacities": [12, 8, 5], "start": [12, 0, 0], "goal": [6, 6, 0]}"#,
        )
        .unwrap();
        assert_eq!(problem.start_configuration(), Configuration::new([12, 0, 0]));
        assert_eq!(problem.goal, Goal::Configuration(Configuration::new([6, 6, 0])));

        assert!(serde_json::from_str::<Problem>(r#"{"capacities": [], "target": 1}"#).is_err());
    }

    #[test]
    fn test_problem_validate() {
        let problem = Problem::with_target(caps(&[3, 5]), 4).with_start(Configuration::new([4, 0]));
        assert!(problem.validate().is_err());

        let problem = Problem::new(caps(&[3, 5]), Goal::Configuration(Configuration::new([1])));
        assert!(problem.validate().is_err());

        assert!(Problem::with_target(caps(&[3, 5]), 9).validate().is_ok());
    }

    #[test]
    fn test_problem_display() {
        let problem = Problem::with_target(caps(&[3, 5]), 4);
        assert_eq!(problem.to_string(), "0/3, 0/5 -> any glass holding 4");

        let problem = Problem::from_glasses("0/5, 0/3", "4/5, 0/3").unwrap();
        assert_eq!(problem.to_string(), "0/5, 0/3 -> 4/5, 0/3");
    }
}
