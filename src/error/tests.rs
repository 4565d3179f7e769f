//! Tests for the error handling system

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_severity() {
        assert_eq!(
            LuapackError::missing_file(PathBuf::from("main.lua")).severity(),
            ErrorSeverity::Error
        );

        assert_eq!(
            LuapackError::circular_dependency(vec![
                PathBuf::from("a.lua"),
                PathBuf::from("a.lua"),
            ])
            .severity(),
            ErrorSeverity::Error
        );

        assert_eq!(
            LuapackError::config_error("Invalid config").severity(),
            ErrorSeverity::Critical
        );

        assert!(LuapackError::config_error("bad").is_critical());
        assert!(!LuapackError::missing_file("main.lua").is_critical());
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(LuapackError::missing_file("x").kind(), "missing_file");
        assert_eq!(
            LuapackError::dynamic_require("x.lua", 3, "require(m)").kind(),
            "dynamic_require"
        );
        assert_eq!(
            LuapackError::module_not_found("m", "x.lua", vec![]).kind(),
            "module_not_found"
        );
        assert_eq!(
            LuapackError::circular_dependency(vec![]).kind(),
            "circular_dependency"
        );
        assert_eq!(
            LuapackError::dependency_limit_exceeded(37, 36).kind(),
            "dependency_limit_exceeded"
        );
    }

    #[test]
    fn test_dynamic_require_message_carries_site() {
        let err = LuapackError::dynamic_require("scripts/app.lua", 12, "require(name)");
        let msg = err.user_message();
        assert!(msg.contains("scripts/app.lua"));
        assert!(msg.contains("12"));
        assert!(msg.contains("require(name)"));
    }

    #[test]
    fn test_module_not_found_lists_searched_locations() {
        let err = LuapackError::module_not_found(
            "util.strings",
            "main.lua",
            vec![
                PathBuf::from("/proj/util/strings.lua"),
                PathBuf::from("/proj/util/strings/init.lua"),
            ],
        );
        let msg = err.user_message();
        assert!(msg.contains("util.strings"));
        assert!(msg.contains("/proj/util/strings.lua"));
        assert!(msg.contains("/proj/util/strings/init.lua"));
    }

    #[test]
    fn test_circular_dependency_display() {
        let err = LuapackError::circular_dependency(vec![
            PathBuf::from("a.lua"),
            PathBuf::from("b.lua"),
            PathBuf::from("a.lua"),
        ]);
        let rendered = err.to_string();
        assert!(rendered.contains("a.lua -> b.lua -> a.lua"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: LuapackError = io_err.into();
        assert_eq!(err.kind(), "io");
        assert_eq!(err.severity(), ErrorSeverity::Error);
    }
}
