use chrono::NaiveDate;
use thiserror::Error;

use crate::schema::{
    CaseNumber, EpisodeNumber, EpisodeNumberParseError, EpisodeRecord, Investigators, Title,
};

/// Extensions of video containers found in the inventory.
/// These are stripped from the observed name before it is compared with a canonical name.
pub const MEDIA_EXTENSIONS: &[&str] = &["avi", "mkv", "mp4", "m4v", "mpg", "ts"];

/// Extensions of caption, subtitle and info files lying next to the videos.
pub const SUPPLEMENTAL_EXTENSIONS: &[&str] = &["srt", "ttml", "vtt", "sub", "idx", "nfo"];

/// Builds the canonical file name (without extension) of an episode.
///
/// Only names carrying a case number pad the episode number to three digits.
/// The inventory was named that way, so the asymmetry must stay for byte-wise comparison.
pub fn make_filename(
    episode_number: EpisodeNumber,
    air_date: NaiveDate,
    investigators: &Investigators,
    case_number: Option<CaseNumber>,
    title: &Title,
) -> String {
    let air_date = air_date.format("%Y-%m-%d");
    match case_number {
        Some(case_number) => format!(
            "Tatort - {:03} - {air_date} - {investigators} ({case_number}) - {title}",
            episode_number.get()
        ),
        None => format!("Tatort - {episode_number} - {air_date} - {investigators} - {title}"),
    }
}

#[derive(PartialEq, Eq, Debug, Error)]
pub enum FilenameParseError {
    #[error("The name does not follow the `Tatort - <episode> - <date> - <names> - <title>.<ext>` pattern")]
    PatternMismatch,
    #[error("Invalid episode number: {0}")]
    EpisodeNumber(#[from] EpisodeNumberParseError),
    #[error("Invalid air date: {0}")]
    AirDate(#[from] chrono::ParseError),
    #[error("Invalid case number: {0}")]
    CaseNumber(#[from] std::num::ParseIntError),
}

/// Decodes an observed file name into a record without channel.
///
/// A trailing part letter on the episode number (`12a`) is dropped,
/// so all parts of a split episode land on the same episode number.
pub fn parse_filename(name: &str) -> Result<EpisodeRecord, FilenameParseError> {
    let captures = regex!(
        r"^(?P<prefix>.*?)Tatort - (?P<episode>\d+)(?P<part>[a-e])? - (?P<air_date>\d{4}-\d{2}-\d{2}) - (?P<investigators>[\w,.\s]+?)(?:\s*\((?P<case>\d+(?:[,\-]\d+)*)\))? - (?P<title>.+)\.(?P<extension>\w+)$"
    )
    .captures(name)
    .ok_or(FilenameParseError::PatternMismatch)?;

    let episode_number = captures["episode"].parse::<EpisodeNumber>()?;
    let air_date = NaiveDate::parse_from_str(&captures["air_date"], "%Y-%m-%d")?;
    let investigators = Investigators::from(captures["investigators"].trim().to_owned());
    // A joined case like `(12,13)` keeps only its first number.
    let case_number = captures
        .name("case")
        .map(|case| {
            let first = case
                .as_str()
                .split([',', '-'])
                .next()
                .unwrap_or_default();
            first.parse::<u32>().map(CaseNumber::from)
        })
        .transpose()?;
    let title = Title::from(captures["title"].to_owned());

    Ok(EpisodeRecord::builder()
        .episode_number(episode_number)
        .title(title)
        .air_date(air_date)
        .investigators(investigators)
        .case_number(case_number)
        .filename(strip_media_extension(name).to_owned())
        .build())
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, extension)| extension)
}

/// Removes a known media extension; other extensions are left intact.
pub fn strip_media_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, extension))
            if MEDIA_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension)) =>
        {
            stem
        }
        _ => name,
    }
}

/// Whether an inventory entry is a directory placeholder or a file accompanying a video.
/// Such entries are dropped before decoding and are not reported.
pub fn is_supplemental(entry: &str) -> bool {
    if matches!(entry, "." | "..") || entry.ends_with("./") || entry.ends_with("../") {
        return true;
    }
    extension(entry).is_some_and(|extension| {
        SUPPLEMENTAL_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    })
}
