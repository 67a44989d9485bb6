use chrono::Local;

/// What a time stamp is placed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    File,
    Folder,
}

impl RecordType {
    fn as_str(&self) -> &'static str {
        match self {
            RecordType::File => "file",
            RecordType::Folder => "folder",
        }
    }
}

/// Login name of the user running the program, as reported by the OS
pub fn current_user() -> String {
    whoami::username()
}

/// Prefix `content` with a commented "autogenerated, do not edit" stamp
///
/// ```
/// use ertobs_tools::utils::timestamp::{add_time_stamp, RecordType};
///
/// let stamped = add_time_stamp("BODY\n", RecordType::File, "--");
/// assert!(stamped.starts_with("--This file is autogenerated by "));
/// assert!(stamped.contains("-- DO NOT EDIT THIS FILE MANUALLY!\n"));
/// assert!(stamped.ends_with("BODY\n"));
/// ```
pub fn add_time_stamp(content: &str, record_type: RecordType, comment_mark: &str) -> String {
    let ctime = Local::now().format("%Y-%m-%d:%H:%M:%S");
    let type_str = record_type.as_str();

    format!(
        "{mark}This {kind} is autogenerated by {user} running {program} at {ctime}\n\
         {mark} DO NOT EDIT THIS {upper} MANUALLY!\n{content}",
        mark = comment_mark,
        kind = type_str,
        user = current_user(),
        program = env!("CARGO_PKG_NAME"),
        ctime = ctime,
        upper = type_str.to_uppercase(),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_stamp() {
        let stamped = add_time_stamp("", RecordType::Folder, "--");
        let lines: Vec<&str> = stamped.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("--This folder is autogenerated by "));
        assert!(lines[0].contains(env!("CARGO_PKG_NAME")));
        assert_eq!(lines[1], "-- DO NOT EDIT THIS FOLDER MANUALLY!");
    }

    #[test]
    fn test_user_does_not_depend_on_environment() {
        let expected = current_user();
        assert!(!expected.is_empty());

        let saved: Vec<_> = ["USER", "LOGNAME", "USERNAME"]
            .iter()
            .map(|key| (*key, std::env::var_os(key)))
            .collect();
        for (key, _) in &saved {
            std::env::remove_var(key);
        }

        let user = current_user();

        for (key, value) in saved {
            if let Some(value) = value {
                std::env::set_var(key, value);
            }
        }
        assert_eq!(user, expected);
    }

    #[test]
    fn test_custom_comment_mark() {
        let stamped = add_time_stamp("a b\n", RecordType::File, "#");
        assert!(stamped.starts_with("#This file"));
        assert!(stamped.contains("\n# DO NOT EDIT THIS FILE MANUALLY!\n"));
        assert!(stamped.ends_with("a b\n"));
    }
}
