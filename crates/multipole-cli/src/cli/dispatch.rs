use std::path::Path;

pub(super) const PROGRAM_NAME: &str = "multipole";

/// Subcommands that may also be invoked through an executable of the same name.
pub(super) const ALIASED_COMMANDS: [&str; 2] = ["besseli", "gaunt"];

pub(super) fn command_alias_from_program_name(program_name: &str) -> Option<&'static str> {
    let executable_name = Path::new(program_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(program_name);
    let normalized = executable_name
        .strip_suffix(".exe")
        .unwrap_or(executable_name);

    if normalized == PROGRAM_NAME {
        return None;
    }

    ALIASED_COMMANDS
        .iter()
        .copied()
        .find(|command| *command == normalized)
}

pub(super) fn full_args(program_name: &str, args: Vec<String>) -> Vec<String> {
    let alias = command_alias_from_program_name(program_name);
    std::iter::once(PROGRAM_NAME.to_string())
        .chain(alias.map(str::to_string))
        .chain(args)
        .collect()
}
