use std::{fmt::Display, num::ParseIntError, str::FromStr};

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use thiserror::Error;
use typed_builder::TypedBuilder;

/// One catalog entry, either scraped from the episode list or decoded from a file name.
#[derive(Clone, PartialEq, Eq, Debug, TypedBuilder, CopyGetters, Getters)]
pub struct EpisodeRecord {
    #[getset(get_copy = "pub")]
    episode_number: EpisodeNumber,
    #[getset(get = "pub")]
    title: Title,
    /// Empty for records decoded from local file names.
    #[getset(get = "pub")]
    #[builder(default)]
    channel: Channel,
    #[getset(get_copy = "pub")]
    air_date: NaiveDate,
    #[getset(get = "pub")]
    investigators: Investigators,
    #[getset(get_copy = "pub")]
    #[builder(default)]
    case_number: Option<CaseNumber>,
    /// For scraped records this is the canonical name built by [`crate::filename::make_filename`].
    /// For local records it is the observed name without its media extension.
    #[getset(get = "pub")]
    filename: String,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EpisodeNumber(u32);

#[derive(PartialEq, Eq, Debug, Error)]
pub enum EpisodeNumberParseError {
    #[error("Value cannot be parsed as an integer: {0}")]
    ParseIntError(#[from] ParseIntError),
    #[error("Episode numbers start from 1")]
    Zero,
}

impl EpisodeNumber {
    pub fn get(self) -> u32 {
        self.0
    }
}
impl TryFrom<u32> for EpisodeNumber {
    type Error = EpisodeNumberParseError;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Err(EpisodeNumberParseError::Zero),
            _ => Ok(Self(value)),
        }
    }
}
impl FromStr for EpisodeNumber {
    type Err = EpisodeNumberParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>()?.try_into()
    }
}
impl Display for EpisodeNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// Distinguishes entries sharing an episode number, such as two-part broadcasts.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Debug,
    derive_more::From,
    derive_more::Into,
    derive_more::Display,
)]
pub struct CaseNumber(u32);

#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::From,
    derive_more::AsRef,
    derive_more::Display,
)]
#[as_ref(forward)]
pub struct Title(String);

#[derive(
    Clone,
    Default,
    PartialEq,
    Eq,
    Debug,
    derive_more::From,
    derive_more::AsRef,
    derive_more::Display,
)]
#[as_ref(forward)]
pub struct Channel(String);

/// Comma separated list of investigator names.
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    derive_more::From,
    derive_more::AsRef,
    derive_more::Display,
)]
#[as_ref(forward)]
pub struct Investigators(String);

impl Investigators {
    /// Rewrites the natural-language conjunction of the episode list into a comma,
    /// e.g. `Trimmel und Kressin` becomes `Trimmel, Kressin`.
    pub fn from_source_text(text: &str) -> Self {
        Self(text.replace(" und", ","))
    }
}
