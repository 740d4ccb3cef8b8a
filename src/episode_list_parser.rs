use chrono::NaiveDate;
use itertools::Itertools;
use log::{debug, trace};
use scraper::{ElementRef, Html};
use thiserror::Error;

use crate::{
    filename::make_filename,
    markup::{child_elements_named, descendant_texts, first_text},
    schema::{
        CaseNumber, Channel, EpisodeNumber, EpisodeNumberParseError, EpisodeRecord, Investigators,
        Title,
    },
};

/// Columns of the episode table, in document order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, derive_more::Display)]
pub enum Column {
    #[display("episode number")]
    EpisodeNumber,
    #[display("title")]
    Title,
    #[display("channel")]
    Channel,
    #[display("air date")]
    AirDate,
    #[display("investigators")]
    Investigators,
    #[display("case number")]
    CaseNumber,
}
impl Column {
    fn index(self) -> usize {
        self as usize
    }
}

/// The episode list does not have the expected shape. Parsing stops at the first of these.
#[derive(Debug, Error)]
pub enum SourceStructureError {
    #[error("The episode table (`table.wikitable`) was not found")]
    TableNotFound,
    #[error("Row {row}: the {column} cell is missing")]
    MissingCell { row: usize, column: Column },
    #[error("Row {row}: the {column} cell has no text")]
    MissingText { row: usize, column: Column },
    #[error("Row {row}: no `day. month. year` date in the air date cell")]
    MissingAirDate { row: usize },
    #[error("Row {row}: invalid episode number: {source}")]
    EpisodeNumber {
        row: usize,
        source: EpisodeNumberParseError,
    },
    #[error("Row {row}: invalid case number: {text:?}")]
    CaseNumber { row: usize, text: String },
    #[error("Episode {0} appears more than once in the episode list")]
    DuplicateEpisode(EpisodeNumber),
}

/// Month abbreviations as written in the air date column.
/// Both German and English spellings of the differing months are accepted.
pub const MONTHS: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mär", 3),
    ("mar", 3),
    ("apr", 4),
    ("mai", 5),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("okt", 10),
    ("oct", 10),
    ("nov", 11),
    ("dez", 12),
    ("dec", 12),
];

fn month_index(name: &str) -> Option<u32> {
    let abbreviation = name.chars().take(3).collect::<String>().to_lowercase();
    MONTHS
        .iter()
        .find(|(known, _)| *known == abbreviation)
        .map(|&(_, index)| index)
}

/// Parses a date like `29. Nov. 1970` at the start of the text.
pub fn parse_localized_date(text: &str) -> Option<NaiveDate> {
    let captures =
        regex!(r"^(?P<day>\d{1,2})\.\s*(?P<month>\p{L}{3,4})\.?\s+(?P<year>\d{4})")
            .captures(text.trim_start())?;
    let day = captures["day"].parse().ok()?;
    let month = month_index(&captures["month"])?;
    let year = captures["year"].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Reads every episode row of the episode list, sorted by episode number.
pub fn parse(html: &Html) -> Result<Vec<EpisodeRecord>, SourceStructureError> {
    let table = html
        .select(selector!("table.wikitable"))
        .next()
        .ok_or(SourceStructureError::TableNotFound)?;
    let mut records = vec![];
    // Header rows only have `th` cells and are skipped.
    for (row, tr) in (1..).zip(
        table
            .select(selector!("tr"))
            .filter(|tr| child_elements_named(*tr, "td").next().is_some()),
    ) {
        let record = parse_row(row, tr)?;
        trace!("Row {row}: {}", record.filename());
        records.push(record);
    }
    records.sort_by_key(|record| record.episode_number());
    debug!("Parsed {} rows from the episode list", records.len());
    Ok(records)
}

fn parse_row(row: usize, tr: ElementRef) -> Result<EpisodeRecord, SourceStructureError> {
    let cells = child_elements_named(tr, "td").collect_vec();
    let cell = |column: Column| {
        cells
            .get(column.index())
            .copied()
            .ok_or(SourceStructureError::MissingCell { row, column })
    };
    let text = |column: Column| {
        first_text(cell(column)?).ok_or(SourceStructureError::MissingText { row, column })
    };

    let episode_number = text(Column::EpisodeNumber)?
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .parse::<EpisodeNumber>()
        .map_err(|source| SourceStructureError::EpisodeNumber { row, source })?;

    let title = Title::from(text(Column::Title)?.to_owned());

    let channel = first_text(cell(Column::Channel)?)
        .map(|channel| Channel::from(channel.to_owned()))
        .unwrap_or_default();

    let air_date = descendant_texts(cell(Column::AirDate)?)
        .find_map(parse_localized_date)
        .ok_or(SourceStructureError::MissingAirDate { row })?;

    let investigators = Investigators::from_source_text(text(Column::Investigators)?);

    // Descriptive text after the number is dropped, e.g. `12 (Doppelfolge)`.
    let case_number = match first_text(cell(Column::CaseNumber)?) {
        None | Some("") => None,
        Some(case_text) => {
            let number = case_text.split(' ').next().unwrap_or_default();
            Some(CaseNumber::from(number.parse::<u32>().map_err(|_| {
                SourceStructureError::CaseNumber {
                    row,
                    text: case_text.to_owned(),
                }
            })?))
        }
    };

    let filename = make_filename(
        episode_number,
        air_date,
        &investigators,
        case_number,
        &title,
    );
    Ok(EpisodeRecord::builder()
        .episode_number(episode_number)
        .title(title)
        .channel(channel)
        .air_date(air_date)
        .investigators(investigators)
        .case_number(case_number)
        .filename(filename)
        .build())
}
