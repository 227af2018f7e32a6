//! Supported disclosure standards
//!
//! The set is closed: every consumer matches on [`StandardId`] exhaustively, so adding
//! a standard is a compile error until every mapper and rule set handles it.

use crate::error::{Result, TypesError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// CRIRSCO-family reporting standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StandardId {
    /// Australasian JORC Code (2012 edition)
    #[serde(rename = "JORC")]
    Jorc,

    /// Canadian National Instrument 43-101
    #[serde(rename = "NI43-101")]
    Ni43101,

    /// Pan-European Reserves and Resources Reporting Committee standard
    #[serde(rename = "PERC")]
    Perc,

    /// South African SAMREC Code
    #[serde(rename = "SAMREC")]
    Samrec,

    /// Brazilian CBRR code (ANM-regulated)
    #[serde(rename = "CBRR")]
    Cbrr,
}

impl StandardId {
    /// Every registered standard, in registry order
    pub const ALL: [StandardId; 5] = [
        StandardId::Jorc,
        StandardId::Ni43101,
        StandardId::Perc,
        StandardId::Samrec,
        StandardId::Cbrr,
    ];

    /// Stable machine identifier
    pub fn id(&self) -> &'static str {
        match self {
            Self::Jorc => "JORC",
            Self::Ni43101 => "NI43-101",
            Self::Perc => "PERC",
            Self::Samrec => "SAMREC",
            Self::Cbrr => "CBRR",
        }
    }

    /// Value of the `standard` discriminator in mapper output
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Jorc => "JORC 2012",
            Self::Ni43101 => "NI 43-101",
            Self::Perc => "PERC",
            Self::Samrec => "SAMREC",
            Self::Cbrr => "CBRR",
        }
    }

    /// Value of the `standardFullName` discriminator in mapper output
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Jorc => {
                "Australasian Code for Reporting of Exploration Results, Mineral Resources and Ore Reserves"
            }
            Self::Ni43101 => "National Instrument 43-101 Standards of Disclosure for Mineral Projects",
            Self::Perc => "Pan-European Reserves and Resources Reporting Committee Standard",
            Self::Samrec => {
                "South African Code for the Reporting of Exploration Results, Mineral Resources and Mineral Reserves"
            }
            Self::Cbrr => "Código Brasileiro de Recursos e Reservas Minerais",
        }
    }

    /// Title given to the signing professional under this standard
    pub fn person_role(&self) -> &'static str {
        match self {
            Self::Jorc => "Competent Person",
            Self::Ni43101 => "Qualified Person",
            Self::Perc => "Competent Person (PERC)",
            Self::Samrec => "Competent Person (SAMREC)",
            Self::Cbrr => "Pessoa Qualificada (PQ)",
        }
    }

    /// Sentinel for fields the canonical report did not carry
    pub fn not_provided(&self) -> &'static str {
        match self {
            Self::Cbrr => "Não informado",
            _ => "Not provided",
        }
    }

    /// Sentinel for required fields backfilled during a standard-to-standard conversion
    pub fn to_be_provided(&self) -> &'static str {
        match self {
            Self::Cbrr => "A ser informado",
            _ => "To be provided",
        }
    }

    /// Whether the standard is published in Portuguese
    pub fn is_portuguese(&self) -> bool {
        matches!(self, Self::Cbrr)
    }

    /// Whether a value is one of the sentinels any standard emits for missing data
    pub fn is_sentinel(value: &str) -> bool {
        let value = value.trim();
        value.is_empty()
            || value == "-"
            || Self::ALL
                .iter()
                .any(|s| value == s.not_provided() || value == s.to_be_provided())
    }
}

impl fmt::Display for StandardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StandardId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();

        match key.as_str() {
            "JORC" | "JORC2012" => Ok(Self::Jorc),
            "NI43101" | "NI43" => Ok(Self::Ni43101),
            "PERC" => Ok(Self::Perc),
            "SAMREC" => Ok(Self::Samrec),
            "CBRR" => Ok(Self::Cbrr),
            _ => Err(TypesError::UnsupportedStandard(s.to_string())),
        }
    }
}
