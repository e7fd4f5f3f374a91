//! Shell integration
//!
//! A child process cannot change its parent's directory, so `giwo switch`
//! writes the chosen path to the file named by `GIWO_SWITCH_FILE` and a
//! shell function does the `cd`. Install it with, for example:
//!
//! ```text
//! eval "$(giwo shell-init bash)"
//! ```

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

const POSIX_FUNCTION: &str = r#"giwo() {
    if [ "$1" = "switch" ] || [ "$1" = "sw" ]; then
        local switch_file ret
        switch_file="$(mktemp "${TMPDIR:-/tmp}/giwo-switch.XXXXXX")" || return 1
        GIWO_SWITCH_FILE="$switch_file" command giwo "$@"
        ret=$?
        if [ -s "$switch_file" ]; then
            cd "$(cat "$switch_file")" || ret=$?
        fi
        rm -f "$switch_file"
        return $ret
    fi
    command giwo "$@"
}"#;

const FISH_FUNCTION: &str = r#"function giwo
    if test (count $argv) -gt 0; and contains -- $argv[1] switch sw
        set -l switch_file (mktemp)
        GIWO_SWITCH_FILE=$switch_file command giwo $argv
        set -l ret $status
        if test -s $switch_file
            cd (cat $switch_file)
        end
        rm -f $switch_file
        return $ret
    end
    command giwo $argv
end"#;

/// The wrapper function for `shell`
pub fn shell_function(shell: Shell) -> &'static str {
    match shell {
        Shell::Bash | Shell::Zsh => POSIX_FUNCTION,
        Shell::Fish => FISH_FUNCTION,
    }
}

pub fn print_shell_init(shell: Shell) {
    println!("{}", shell_function(shell));
}
