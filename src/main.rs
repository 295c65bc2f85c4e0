use std::env;

use indicatif::ProgressBar;
use videoset::VideoDataset;

struct Args {
    annotation: String,
    database: String,
    clips: usize,
    frames: usize,
}

/// Parses the self-test CLI arguments.
///
/// Expects the positional `annotation` and `database` paths; `--clips`
/// defaults to 1 and `--frames` to 16.
fn parse_cli<I>(mut args: I) -> Option<Args>
where
    I: Iterator<Item = String>,
{
    let mut clips = 1usize;
    let mut frames = 16usize;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--clips" => {
                if let Some(n) = args.next() {
                    clips = n.parse().unwrap_or(1);
                }
            }
            "--frames" => {
                if let Some(n) = args.next() {
                    frames = n.parse().unwrap_or(16);
                }
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() < 2 {
        return None;
    }
    Some(Args {
        annotation: positional[0].clone(),
        database: positional[1].clone(),
        clips,
        frames,
    })
}

fn main() {
    env_logger::init();
    let Some(args) = parse_cli(env::args().skip(1)) else {
        eprintln!("Usage: videoset <annotation> <database> [--clips N] [--frames N]");
        return;
    };

    let dataset = match VideoDataset::open(&args.annotation, &args.database, args.clips, args.frames)
    {
        Ok(d) => d,
        Err(e) => {
            eprintln!("failed to open dataset: {}", e);
            return;
        }
    };
    println!("{}", dataset);

    let pb = ProgressBar::new(dataset.len() as u64);
    let mut error_index = Vec::new();
    for i in 0..dataset.len() {
        match dataset.get(i) {
            Ok((video, label)) => {
                pb.println(format!(
                    "Index {}, class label {}, shape {:?}",
                    i,
                    label,
                    video.shape()
                ));
            }
            Err(e) => {
                pb.println(format!("=====> Video {} check failed: {}", i, e));
                error_index.push(i);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("There are {} videos.", dataset.len());
    if error_index.is_empty() {
        println!("All is well! Congratulations!");
    } else {
        println!("Ooops! There are {} bad videos:", error_index.len());
        println!("{:?}", error_index);
    }
}
