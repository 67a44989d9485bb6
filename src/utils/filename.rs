use crate::utils::constants::DEFAULT_REPORT_STEP;
use std::path::Path;

/// Make a well name safe to use as part of a file name
///
/// Whitespace, path separators and dots are replaced with underscores, so
/// `"25/11-A 4.H"` becomes `"25_11-A_4_H"`.
pub fn sanitize_well_name(well_name: &str) -> String {
    well_name
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || matches!(c, '/' | '\\' | '.') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Split an observation file name into well name and report step
///
/// `R_A2_1.obs` gives `("R_A2", 1)`. Names without a trailing `_<digits>`
/// give the file stem and the default report step.
pub fn parse_obs_filename(path: &Path) -> Option<(String, u32)> {
    let stem = path.file_stem()?.to_str()?;
    if stem.is_empty() {
        return None;
    }

    if let Some((well, step)) = stem.rsplit_once('_') {
        if !well.is_empty() && !step.is_empty() && step.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(report_step) = step.parse::<u32>() {
                return Some((well.to_string(), report_step));
            }
        }
    }

    Some((stem.to_string(), DEFAULT_REPORT_STEP))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_sanitize_well_name() {
        assert_eq!(sanitize_well_name("R_A2"), "R_A2");
        assert_eq!(sanitize_well_name("25/11-A 4.H"), "25_11-A_4_H");
        assert_eq!(sanitize_well_name(" OP 1 "), "OP_1");
    }

    #[test]
    fn test_parse_obs_filename_with_report_step() {
        let parsed = parse_obs_filename(&PathBuf::from("rft/R_A2_1.obs")).unwrap();
        assert_eq!(parsed, ("R_A2".to_string(), 1));

        let parsed = parse_obs_filename(&PathBuf::from("OP_1_12.obs")).unwrap();
        assert_eq!(parsed, ("OP_1".to_string(), 12));
    }

    #[test]
    fn test_parse_obs_filename_without_report_step() {
        let parsed = parse_obs_filename(&PathBuf::from("foo.obs")).unwrap();
        assert_eq!(parsed, ("foo".to_string(), DEFAULT_REPORT_STEP));

        let parsed = parse_obs_filename(&PathBuf::from("R_A2.obs")).unwrap();
        assert_eq!(parsed, ("R_A2".to_string(), DEFAULT_REPORT_STEP));

        // a trailing underscore is part of the well name
        let parsed = parse_obs_filename(&PathBuf::from("W_.obs")).unwrap();
        assert_eq!(parsed, ("W_".to_string(), DEFAULT_REPORT_STEP));
    }
}
