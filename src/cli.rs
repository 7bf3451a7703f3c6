use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::{
    DEFAULT_CATALOGUE, DEFAULT_COMMUNITY, DEFAULT_DELAY_MS, DEFAULT_OUT_DIR, DEFAULT_PAGE_SIZE,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// More diagnostics on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Harvest a Zenodo community (and the OBIS IPT feed) into a JSON-LD catalogue
    Harvest {
        /// Zenodo community identifier
        #[arg(long, default_value = DEFAULT_COMMUNITY)]
        community: String,
        /// Catalogue file to write
        #[arg(short, long, value_name = "PATH", default_value = DEFAULT_CATALOGUE)]
        output: PathBuf,
        /// Stop after this many search pages
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
        max_pages: Option<u32>,
        /// Records per search page
        #[arg(long, value_name = "N", default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
        page_size: u32,
        /// Pause between two requests, in milliseconds
        #[arg(long, value_name = "MS", default_value_t = DEFAULT_DELAY_MS)]
        delay_ms: u64,
    },
    /// Turn a catalogue into one Project JSON-LD file per record
    Project {
        /// Catalogue file to read
        #[arg(long, value_name = "PATH", default_value = DEFAULT_CATALOGUE)]
        input: PathBuf,
        /// Directory for the per-record files
        #[arg(long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
        /// Prefix for each record's @id; the file's relative path is appended
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,
        /// Also write an XML sitemap of the @id URLs
        #[arg(long, value_name = "PATH")]
        sitemap: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_defaults() {
        let cli = Cli::try_parse_from(["metacat", "harvest"]).expect("parse");
        match cli.command {
            Command::Harvest {
                community,
                output,
                max_pages,
                page_size,
                delay_ms,
            } => {
                assert_eq!(community, "bioecoocean");
                assert_eq!(output, PathBuf::from("bioecoocean-catalogue.jsonld"));
                assert_eq!(max_pages, None);
                assert_eq!(page_size, 25);
                assert_eq!(delay_ms, 1200);
            }
            _ => panic!("expected harvest"),
        }
    }

    #[test]
    fn project_accepts_all_options() {
        let cli = Cli::try_parse_from([
            "metacat",
            "-vv",
            "project",
            "--input",
            "cat.jsonld",
            "--out-dir",
            "out",
            "--base-url",
            "https://x.org/repo",
            "--sitemap",
            "sitemap.xml",
        ])
        .expect("parse");
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Project {
                input,
                out_dir,
                base_url,
                sitemap,
            } => {
                assert_eq!(input, PathBuf::from("cat.jsonld"));
                assert_eq!(out_dir, PathBuf::from("out"));
                assert_eq!(base_url.as_deref(), Some("https://x.org/repo"));
                assert_eq!(sitemap, Some(PathBuf::from("sitemap.xml")));
            }
            _ => panic!("expected project"),
        }
    }

    #[test]
    fn max_pages_must_be_positive() {
        assert!(Cli::try_parse_from(["metacat", "harvest", "--max-pages", "0"]).is_err());
        proptest::proptest!(|(n in 1u32..10_000)| {
            let cli = Cli::try_parse_from(["metacat", "harvest", "--max-pages", n.to_string().as_str()]).expect("parse");
            match cli.command {
                Command::Harvest { max_pages, .. } => proptest::prop_assert_eq!(max_pages, Some(n)),
                _ => proptest::prop_assert!(false, "expected harvest"),
            }
        })
    }
}
