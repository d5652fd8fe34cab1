//! Shell integration
//!
//! Completion scripts for bash, zsh and fish. Aliases are completed from the
//! live config through `sshcfg aliases`.

use clap::ValueEnum;

/// Shells with a completion script
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Completion script for this shell
    pub fn script(&self) -> &'static str {
        match self {
            Shell::Bash => bash_integration(),
            Shell::Zsh => zsh_integration(),
            Shell::Fish => fish_integration(),
        }
    }
}

/// Generate completion script for bash
pub fn bash_integration() -> &'static str {
    r#"
# sshcfg completion for bash
# Add to ~/.bashrc: source <(sshcfg completions bash)

_sshcfg_completions() {
    local cur="${COMP_WORDS[COMP_CWORD]}"
    local cmd="${COMP_WORDS[1]}"

    if [ "$COMP_CWORD" -eq 1 ]; then
        COMPREPLY=($(compgen -W "add delete get patch aliases completions init" -- "$cur"))
        return
    fi

    case "$cmd" in
        delete)
            COMPREPLY=($(compgen -W "$(sshcfg aliases 2>/dev/null)" -- "$cur"))
            ;;
        get)
            COMPREPLY=($(compgen -W "all $(sshcfg aliases 2>/dev/null)" -- "$cur"))
            ;;
        patch)
            if [ "$COMP_CWORD" -eq 2 ]; then
                COMPREPLY=($(compgen -W "$(sshcfg aliases 2>/dev/null)" -- "$cur"))
            elif [ $((COMP_CWORD % 2)) -eq 1 ]; then
                COMPREPLY=($(compgen -W "host hostName user identityFile port" -- "$cur"))
            fi
            ;;
        add)
            COMPREPLY=($(compgen -W "--hostname --user --identity-file --port" -- "$cur"))
            ;;
        completions)
            COMPREPLY=($(compgen -W "bash zsh fish" -- "$cur"))
            ;;
    esac
}
complete -F _sshcfg_completions sshcfg
"#
}

/// Generate completion script for zsh
pub fn zsh_integration() -> &'static str {
    r#"
# sshcfg completion for zsh
# Add to ~/.zshrc: source <(sshcfg completions zsh)

_sshcfg() {
    local -a commands aliases fields
    commands=(
        'add:Add a section'
        'delete:Delete sections'
        'get:Print sections as YAML'
        'patch:Update fields of a section'
        'aliases:List section aliases'
        'completions:Print a completion script'
        'init:Write the default settings file'
    )
    fields=(host hostName user identityFile port)

    if (( CURRENT == 2 )); then
        _describe 'command' commands
        return
    fi

    aliases=(${(f)"$(sshcfg aliases 2>/dev/null)"})
    case "$words[2]" in
        delete)
            _describe 'alias' aliases
            ;;
        get)
            aliases+=(all)
            _describe 'alias' aliases
            ;;
        patch)
            if (( CURRENT == 3 )); then
                _describe 'alias' aliases
            elif (( CURRENT % 2 == 0 )); then
                _describe 'field' fields
            fi
            ;;
        completions)
            _values 'shell' bash zsh fish
            ;;
    esac
}
compdef _sshcfg sshcfg
"#
}

/// Generate completion script for fish
pub fn fish_integration() -> &'static str {
    r#"
# sshcfg completion for fish
# Save to ~/.config/fish/completions/sshcfg.fish

function __fish_sshcfg_needs_command
    set -l cmd (commandline -opc)
    test (count $cmd) -eq 1
end

function __fish_sshcfg_using_command
    set -l cmd (commandline -opc)
    test (count $cmd) -gt 1 -a "$cmd[2]" = "$argv[1]"
end

function __fish_sshcfg_aliases
    sshcfg aliases 2>/dev/null
end

complete -c sshcfg -f
complete -c sshcfg -n __fish_sshcfg_needs_command -a add -d "Add a section"
complete -c sshcfg -n __fish_sshcfg_needs_command -a delete -d "Delete sections"
complete -c sshcfg -n __fish_sshcfg_needs_command -a get -d "Print sections as YAML"
complete -c sshcfg -n __fish_sshcfg_needs_command -a patch -d "Update fields of a section"
complete -c sshcfg -n __fish_sshcfg_needs_command -a aliases -d "List section aliases"
complete -c sshcfg -n __fish_sshcfg_needs_command -a completions -d "Print a completion script"
complete -c sshcfg -n __fish_sshcfg_needs_command -a init -d "Write the default settings file"

complete -c sshcfg -n "__fish_sshcfg_using_command delete" -a "(__fish_sshcfg_aliases)" -d "Alias"
complete -c sshcfg -n "__fish_sshcfg_using_command get" -a "all (__fish_sshcfg_aliases)" -d "Alias"
complete -c sshcfg -n "__fish_sshcfg_using_command patch" -a "(__fish_sshcfg_aliases)" -d "Alias"
complete -c sshcfg -n "__fish_sshcfg_using_command patch" -a "host hostName user identityFile port" -d "Field"
complete -c sshcfg -n "__fish_sshcfg_using_command completions" -a "bash zsh fish"

complete -c sshcfg -n "__fish_sshcfg_using_command add" -l hostname -d "Network address"
complete -c sshcfg -n "__fish_sshcfg_using_command add" -l user -d "SSH user"
complete -c sshcfg -n "__fish_sshcfg_using_command add" -l identity-file -r -F -d "Private key"
complete -c sshcfg -n "__fish_sshcfg_using_command add" -l port -d "SSH port"

complete -c sshcfg -s c -l config -d "Custom settings file path"
complete -c sshcfg -s f -l ssh-config -d "SSH config file to edit"
complete -c sshcfg -s d -l debug -d "Enable debug logging"
"#
}

/// Detect the current shell
pub fn detect_shell() -> Option<Shell> {
    std::env::var("SHELL")
        .ok()
        .and_then(|s| s.rsplit('/').next().map(|s| s.to_string()))
        .and_then(|name| Shell::from_str(&name, true).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ssh_config::Field;

    #[test]
    fn test_detect_shell() {
        // Just check it doesn't panic
        let _ = detect_shell();
    }

    #[test]
    fn test_scripts_complete_every_field() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
            let script = shell.script();
            assert!(script.contains("sshcfg aliases"), "{:?}", shell);
            for field in Field::ALL {
                assert!(script.contains(field.as_str()), "{:?} {}", shell, field);
            }
        }
    }
}
