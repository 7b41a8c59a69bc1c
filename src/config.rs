use std::collections::BTreeSet;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::graph::BuildOptions;
use crate::tree::LinkType;

const FOV_RANGE: (f64, f64) = (10.0, 120.0);

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// JSON document tree to explore.
    #[arg(long, default_value = "cre-tree.json")]
    tree: PathBuf,

    /// Relation type to leave out of the graph initially (repeatable).
    #[arg(long = "ignore", value_name = "TYPE", value_parser = parse_link_type)]
    ignore: Vec<LinkType>,

    /// First endpoint selector, e.g. `all:cre`, `group:ASVS` or an identity.
    #[arg(long, default_value = "")]
    select_a: String,

    #[arg(long, default_value = "")]
    select_b: String,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    show_all: bool,

    /// Vertical field of view of the 3D camera, in degrees.
    #[arg(long, default_value_t = 40.0)]
    fov: f64,
}

fn parse_link_type(value: &str) -> Result<LinkType, String> {
    LinkType::parse(value).ok_or_else(|| {
        let known = LinkType::ALL
            .iter()
            .map(|ltype| ltype.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("unknown relation type `{value}` (expected one of: {known})")
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExplorerConfig {
    pub tree_path: PathBuf,
    pub options: BuildOptions,
    pub fov_degrees: f64,
}

impl From<Args> for ExplorerConfig {
    fn from(args: Args) -> Self {
        Self {
            tree_path: args.tree,
            options: BuildOptions {
                ignored: args.ignore.into_iter().collect::<BTreeSet<_>>(),
                select_a: args.select_a.trim().to_owned(),
                select_b: args.select_b.trim().to_owned(),
                show_all: args.show_all,
            },
            fov_degrees: args.fov.clamp(FOV_RANGE.0, FOV_RANGE.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(argv: &[&str]) -> ExplorerConfig {
        let args = Args::try_parse_from(std::iter::once("cre-graph").chain(argv.iter().copied()))
            .unwrap();
        ExplorerConfig::from(args)
    }

    #[test]
    fn defaults() {
        let config = config(&[]);
        assert_eq!(config.tree_path, PathBuf::from("cre-tree.json"));
        assert_eq!(config.options, BuildOptions::default());
        assert_eq!(config.fov_degrees, 40.0);
    }

    #[test]
    fn repeated_ignores_and_selectors() {
        let config = config(&[
            "--tree",
            "data/tree.json",
            "--ignore",
            "contains",
            "--ignore",
            "Linked To",
            "--select-a",
            " all:cre ",
            "--show-all",
            "false",
            "--fov",
            "500",
        ]);

        assert_eq!(
            config.options.ignored,
            BTreeSet::from([LinkType::Contains, LinkType::LinkedTo])
        );
        assert_eq!(config.options.select_a, "all:cre");
        assert!(!config.options.show_all);
        assert_eq!(config.fov_degrees, 120.0);
    }

    #[test]
    fn unknown_relation_type_is_rejected() {
        let error = Args::try_parse_from(["cre-graph", "--ignore", "sibling"]).unwrap_err();
        assert!(error.to_string().contains("sibling"));
    }
}
