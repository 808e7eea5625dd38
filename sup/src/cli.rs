//! Command-line surface.

use std::path::PathBuf;

use clap::Parser;

/// Dashboard of open pull requests across your GitHub organizations.
///
/// Enter checks the selected PR out in its local clone; `o` opens it in the
/// browser.
#[derive(Parser, Debug, Default)]
#[command(name = "sup", version, about)]
pub struct Cli {
    /// Show PRs involving you instead of whole organizations.
    #[arg(short, long)]
    pub mine: bool,

    /// Organizations to list, comma separated.
    #[arg(long = "org", env = "SUP_ORG", value_delimiter = ',')]
    pub orgs: Vec<String>,

    /// Directory holding your clones, searched before the usual places.
    #[arg(long, env = "SUP_DEV_DIR")]
    pub dev_dir: Option<PathBuf>,

    /// Use built-in sample data; nothing is fetched, cached, or checked out.
    #[arg(long)]
    pub demo: bool,

    /// On Enter, write the repository path to `$TMPDIR/sup_cd_path` instead of
    /// checking the PR out.
    #[arg(long)]
    pub cd: bool,

    /// Color theme: catppuccin-mocha, classic, or dark.
    #[arg(long)]
    pub theme: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn org_list_splits_on_commas() {
        let cli = Cli::try_parse_from(["sup", "--org", "acme,globex", "--org", "initech"]).unwrap();
        assert_eq!(cli.orgs, vec!["acme", "globex", "initech"]);
    }

    #[test]
    fn short_mine_flag() {
        let cli = Cli::try_parse_from(["sup", "-m", "--cd"]).unwrap();
        assert!(cli.mine);
        assert!(cli.cd);
        assert!(!cli.demo);
    }
}
