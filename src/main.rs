use luapack::{
    cli::{self, Args},
    error::{ErrorSeverity, LuapackError},
};
use std::process;

fn main() {
    let args = Args::parse_args();
    let exit_code = run_command(args);
    process::exit(exit_code);
}

/// Run the command with proper error handling
fn run_command(args: Args) -> i32 {
    match cli::run(args) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("\nError: {}", err.user_message());

            if let Some(suggestion) = suggestion_for(&err) {
                eprintln!("Suggestion: {}", suggestion);
            }

            // Return appropriate exit code based on error severity
            let exit_code = match err.severity() {
                ErrorSeverity::Warning => 0,
                ErrorSeverity::Error => 1,
                ErrorSeverity::Critical => 2,
            };

            if exit_code > 0 {
                eprintln!("\nExiting with code {} due to {}", exit_code, err.severity());
            }

            exit_code
        }
    }
}

/// A remediation hint for the error families that have an obvious one
fn suggestion_for(err: &LuapackError) -> Option<&'static str> {
    match err {
        LuapackError::MissingFile { .. } => {
            Some("Check that the path exists and is spelled correctly")
        }
        LuapackError::DynamicRequire { .. } => {
            Some("Replace the dynamic require with a literal module name, or bundle the module explicitly with --require")
        }
        LuapackError::ModuleNotFound { .. } => {
            Some("Make sure the module is on LUA_PATH or installed via luarocks")
        }
        LuapackError::DependencyLimitExceeded { .. } => {
            Some("Raise the cap with --max-deps if the dependency tree is legitimately this large")
        }
        LuapackError::ConfigNotFound { .. } => {
            Some("Create a .luapack.toml with 'luapack init' or pass --config")
        }
        LuapackError::BundlerNotFound { .. } => {
            Some("Run 'luapack engines' to see which external tools are missing")
        }
        _ => None,
    }
}
