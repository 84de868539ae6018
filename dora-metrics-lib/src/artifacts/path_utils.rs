/// Turn an artifact name into a single safe directory name.
///
/// Path separators, traversal sequences and characters that are invalid on
/// common filesystems become `_`. Leading dots are replaced too, so an artifact
/// can never land in a hidden directory or collide with a staging directory.
#[must_use]
pub fn sanitize_path_component(s: &str) -> String {
    let s = s.replace("..", "__");
    let s = s.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'], "_");

    let dots = s.len() - s.trim_start_matches('.').len();
    let s = format!("{}{}", "_".repeat(dots), &s[dots..]);

    if s.is_empty() { "_".to_string() } else { s }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_names_are_kept() {
        assert_eq!(sanitize_path_component("dora-metrics"), "dora-metrics");
        assert_eq!(sanitize_path_component("dora-metrics.api"), "dora-metrics.api");
    }

    #[test]
    fn test_traversal_is_neutralized() {
        assert_eq!(sanitize_path_component(".."), "__");
        assert_eq!(sanitize_path_component("../../etc/passwd"), "______etc_passwd");
    }

    #[test]
    fn test_separators_and_reserved_chars() {
        assert_eq!(sanitize_path_component("a/b\\c:d*e?f\"g<h>i|j"), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_leading_dot_is_replaced() {
        assert_eq!(sanitize_path_component(".staging"), "_staging");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(sanitize_path_component(""), "_");
    }
}
