//! ziptree - stream a git tree as a ZIP archive
//!
//! Reads loose objects straight out of a repository and writes a ZIP file
//! in one forward pass, without touching the working tree.

use clap::Parser;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use ziptree_core::DosDateTime;
use ziptree_odb::{ObjectDb, resolve_treeish, walk};
use ziptree_stream::{EntryOutcome, ZipStreamer};

#[derive(Parser)]
#[command(name = "ziptree")]
#[command(author, version, about = "Archive a git tree as a ZIP file")]
#[command(long_about = "
ziptree walks the given tree-ish and streams its blobs into a ZIP
archive, never touching the working tree.

Examples:
  ziptree HEAD > snapshot.zip
  ziptree -o release.zip --git-dir /src/project v1.2 project-1.2
  ziptree -l 0 main
")]
struct Cli {
    /// Compression level (0 stores everything uncompressed)
    #[arg(short = 'l', long, default_value_t = 6, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: u32,

    /// Repository to read from (worktree or git directory)
    #[arg(long, default_value = ".")]
    git_dir: PathBuf,

    /// Write the archive here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Commit, tag, branch or tree to archive
    tree_ish: String,

    /// Directory prefix for every archived path
    base: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cmd_archive(&cli) {
        eprintln!("ziptree: {}", e);
        std::process::exit(1);
    }
}

fn cmd_archive(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let db = ObjectDb::open(&cli.git_dir)?;
    let resolved = resolve_treeish(&db, &cli.tree_ish)?;

    // Every entry shares one timestamp so identical inputs give identical
    // archives; without a commit behind the tree, fall back to "now".
    let stamp = match resolved.commit_time {
        Some(seconds) => DosDateTime::from_unix(seconds),
        None => DosDateTime::now(),
    };

    let sink: BufWriter<Box<dyn Write>> = BufWriter::new(match &cli.output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout().lock()),
    });

    let mut streamer = ZipStreamer::new(sink, cli.level, stamp)?;

    let base = cli.base.as_deref().map(|b| b.trim_end_matches('/'));
    let prefix = match base {
        Some(b) if !b.is_empty() => {
            streamer.write_entry(&db, &resolved.tree, b"", b.as_bytes(), 0o040000)?;
            let mut p = b.as_bytes().to_vec();
            p.push(b'/');
            p
        }
        _ => Vec::new(),
    };

    walk(&db, &resolved.tree, &prefix, &mut |id, base, name, mode| {
        let outcome = streamer.write_entry(&db, id, base, name, mode)?;
        if let EntryOutcome::Skipped(reason) = &outcome {
            eprintln!("ziptree: {}", reason);
        }
        Ok(outcome.control())
    })?;

    streamer.finish(resolved.commit.as_ref())?;
    Ok(())
}
