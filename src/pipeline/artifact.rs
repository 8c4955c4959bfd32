use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The generated report types, each with a fixed column schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Kpis,
    Risks,
    Raci,
    Controls,
    Agents,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Kpis,
        ArtifactKind::Risks,
        ArtifactKind::Raci,
        ArtifactKind::Controls,
        ArtifactKind::Agents,
    ];

    /// The exact target column list, in export order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Kpis => &[
                "element_id",
                "element_name",
                "kpi_key",
                "current_value",
                "target_value",
                "owner",
                "last_updated",
            ],
            ArtifactKind::Risks => &[
                "element_id",
                "element_name",
                "risk_description",
                "risk_category",
                "likelihood_1to5",
                "impact_1to5",
                "mitigation_owner",
                "control_ref",
            ],
            ArtifactKind::Raci => &["element_id", "element_name", "role", "responsibility_type"],
            ArtifactKind::Controls => &[
                "element_id",
                "element_name",
                "control_name",
                "control_type",
                "frequency",
                "evidence_required",
                "owner",
            ],
            ArtifactKind::Agents => &[
                "element_id",
                "element_name",
                "agent_role",
                "capabilities",
                "decision_logic",
                "confidence_threshold",
                "exception_handler",
                "handoff_to",
            ],
        }
    }

    /// Role framing for the generation prompt.
    pub fn role_framing(self) -> &'static str {
        match self {
            ArtifactKind::Kpis => "a BPM KPI designer",
            ArtifactKind::Risks => "a risk analyst",
            ArtifactKind::Raci => "a process governance expert",
            ArtifactKind::Controls => "an internal controls specialist",
            ArtifactKind::Agents => "an AI solution architect",
        }
    }

    /// Kind-specific value constraints, one instruction line each.
    pub fn constraints(self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Kpis => &[
                "- Use snake_case for kpi_key.",
                "- current_value/target_value numeric or % where sensible.",
                "- last_updated: YYYY-MM-DD.",
            ],
            ArtifactKind::Risks => &[
                "- likelihood_1to5 and impact_1to5: integers from 1 to 5.",
            ],
            ArtifactKind::Raci => &[
                "- responsibility_type: one of R, A, C, I.",
                "- Create 1-3 rows per task.",
            ],
            ArtifactKind::Controls => &[
                "- control_type: Preventive/Detective/Corrective.",
                "- frequency: per_txn, daily, weekly, monthly.",
            ],
            ArtifactKind::Agents => &["- confidence_threshold: 0.0-1.0."],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Kpis => "kpis",
            ArtifactKind::Risks => "risks",
            ArtifactKind::Raci => "raci",
            ArtifactKind::Controls => "controls",
            ArtifactKind::Agents => "agents",
        }
    }

    /// Download filename for the exported CSV.
    pub fn csv_file_name(self) -> String {
        format!("{}.csv", self.as_str())
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown artifact kind in a request path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown artifact kind: {0}")]
pub struct UnknownArtifactKind(pub String);

impl FromStr for ArtifactKind {
    type Err = UnknownArtifactKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim() {
            "kpis" => Ok(ArtifactKind::Kpis),
            "risks" => Ok(ArtifactKind::Risks),
            "raci" => Ok(ArtifactKind::Raci),
            "controls" => Ok(ArtifactKind::Controls),
            "agents" => Ok(ArtifactKind::Agents),
            other => Err(UnknownArtifactKind(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_leads_with_identifier_columns() {
        for kind in ArtifactKind::ALL {
            let cols = kind.columns();
            assert_eq!(cols[0], "element_id", "{kind}");
            assert_eq!(cols[1], "element_name", "{kind}");
        }
    }

    #[test]
    fn kind_round_trips_through_str() {
        for kind in ArtifactKind::ALL {
            assert_eq!(kind.as_str().parse::<ArtifactKind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("RACI".parse::<ArtifactKind>().unwrap(), ArtifactKind::Raci);
        let err = "timesheets".parse::<ArtifactKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown artifact kind: timesheets");
    }

    #[test]
    fn csv_file_names() {
        assert_eq!(ArtifactKind::Kpis.csv_file_name(), "kpis.csv");
        assert_eq!(ArtifactKind::Agents.csv_file_name(), "agents.csv");
    }
}
