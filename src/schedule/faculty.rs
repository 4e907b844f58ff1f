use super::ScheduleError;

/// Resolves the faculty code that a group number belongs to.
///
/// The leading digit selects the faculty; a leading `0` is shared by two
/// faculties and is disambiguated by the second character (`09xx` is the
/// law faculty, any other `0xxx` is the IT faculty). Pure: the same group
/// number always yields the same code.
pub fn faculty_code(group_number: &str) -> Result<&'static str, ScheduleError> {
    let mut chars = group_number.chars();
    let unknown = || ScheduleError::UnknownFaculty {
        group: group_number.to_string(),
    };

    let code = match chars.next().ok_or_else(unknown)? {
        '1' => "rtf",
        '2' => "rkf",
        '3' => "fet",
        '4' => "fsu",
        '5' => "fvs",
        '6' => "gf",
        '7' => "fb",
        '8' => "ef",
        '0' => match chars.next().ok_or_else(unknown)? {
            '9' => "yuf",
            c if c.is_alphanumeric() => "fit",
            _ => return Err(unknown()),
        },
        _ => return Err(unknown()),
    };

    Ok(code)
}
