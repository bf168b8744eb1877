//! Page path parsing.
//!
//! Two path shapes are recognized, relative to the site base directory:
//!
//! - `dir/name.tmpl` is served at `/name` and has no date
//! - `dir/yyyy/mm/name.tmpl` is served at `/dir/yyyy/mm/name` and is dated
//!
//! Anything else is a configuration error.

use crate::date::Date;
use crate::error::SiteError;

/// Extension stripped from page file names.
pub(crate) const TEMPLATE_EXTENSION: &str = ".tmpl";

/// Years must be strictly greater than this.
const MIN_YEAR: u32 = 1900;
/// Years must be strictly less than this.
const MAX_YEAR: u32 = 99_999;

/// Extract the URI and publication date from a page path.
///
/// `path` uses `/` separators and is relative to the site base directory.
///
/// # Errors
///
/// Returns [`SiteError::MalformedPath`] if the path has neither two nor four
/// segments, and [`SiteError::BadYear`] or [`SiteError::BadMonth`] if a dated
/// path carries an invalid date.
pub fn parse_path(path: &str) -> Result<(String, Date), SiteError> {
    let parts: Vec<&str> = path.split('/').collect();
    match parts.as_slice() {
        [_, file] => Ok((format!("/{}", strip_extension(file)), Date::default())),
        [dir, year, month, file] => {
            let date = get_date(year, month)?;
            let uri = format!("/{dir}/{year}/{month}/{}", strip_extension(file));
            Ok((uri, date))
        }
        _ => Err(SiteError::MalformedPath(path.to_owned())),
    }
}

/// Parse the year and month directories of a dated page.
///
/// The year bounds only filter out directory names that are clearly not
/// years; they are not a calendar check.
///
/// # Errors
///
/// Returns [`SiteError::BadYear`] unless `1900 < year < 99999`, and
/// [`SiteError::BadMonth`] unless `1 <= month <= 12`.
pub fn get_date(year: &str, month: &str) -> Result<Date, SiteError> {
    let y = year
        .parse::<u32>()
        .ok()
        .filter(|y| *y > MIN_YEAR && *y < MAX_YEAR)
        .ok_or_else(|| SiteError::BadYear(year.to_owned()))?;
    let m = month
        .parse::<u8>()
        .ok()
        .filter(|m| (1..=12).contains(m))
        .ok_or_else(|| SiteError::BadMonth(month.to_owned()))?;
    Ok(Date::new(y, m))
}

fn strip_extension(file: &str) -> &str {
    file.strip_suffix(TEMPLATE_EXTENSION).unwrap_or(file)
}
