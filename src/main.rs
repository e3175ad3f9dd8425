use std::path::Path;
use std::process::ExitCode;

use textract_overlay::{
    generate_debug_image, init_logging, AnalyzerConfig, DocumentAnalyzer, TextractAnalyzer,
};
use tracing::{error, info};

const USAGE: &str = "Usage:
  textract-overlay analyze <path>
  textract-overlay analyze-s3 <bucket> <key>
  textract-overlay debug <image> <output.png>
  textract-overlay debug-s3 <bucket> <key> <image> <output.png>";

enum Command {
    Analyze { path: String },
    AnalyzeS3 { bucket: String, key: String },
    Debug { image: String, output: String },
    DebugS3 { bucket: String, key: String, image: String, output: String },
}

fn parse_args(args: &[String]) -> Option<Command> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let command = match args.as_slice() {
        ["analyze", path] => Command::Analyze { path: path.to_string() },
        ["analyze-s3", bucket, key] => Command::AnalyzeS3 {
            bucket: bucket.to_string(),
            key: key.to_string(),
        },
        ["debug", image, output] => Command::Debug {
            image: image.to_string(),
            output: output.to_string(),
        },
        ["debug-s3", bucket, key, image, output] => Command::DebugS3 {
            bucket: bucket.to_string(),
            key: key.to_string(),
            image: image.to_string(),
            output: output.to_string(),
        },
        _ => return None,
    };
    Some(command)
}

fn print_blocks(output: &aws_sdk_textract::operation::analyze_document::AnalyzeDocumentOutput) {
    for block in output.blocks() {
        let kind = block.block_type().map(|t| t.as_str()).unwrap_or("?");
        let confidence = block.confidence().unwrap_or(0.0);
        match block.geometry().and_then(|g| g.bounding_box()) {
            Some(b) => println!(
                "{kind:<18} {confidence:>6.2}  left={:.4} top={:.4} width={:.4} height={:.4}  {}",
                b.left(),
                b.top(),
                b.width(),
                b.height(),
                block.text().unwrap_or(""),
            ),
            None => println!("{kind:<18} {confidence:>6.2}  {}", block.text().unwrap_or("")),
        }
    }
}

async fn run(command: Command, config: AnalyzerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let analyzer = TextractAnalyzer::new(&config).await;

    match command {
        Command::Analyze { path } => {
            let output = analyzer.analyze_local_file(Path::new(&path)).await?;
            print_blocks(&output);
        }
        Command::AnalyzeS3 { bucket, key } => {
            let output = analyzer.analyze_remote_file(&bucket, &key).await?;
            print_blocks(&output);
        }
        Command::Debug { image, output } => {
            let analysis = analyzer.analyze_local_file(Path::new(&image));
            let png = generate_debug_image(&image, analysis).await?;
            tokio::fs::write(&output, &png).await?;
            info!(path = %output, bytes = png.len(), "Debug image written");
        }
        Command::DebugS3 { bucket, key, image, output } => {
            let analysis = analyzer.analyze_remote_file(&bucket, &key);
            let png = generate_debug_image(&image, analysis).await?;
            tokio::fs::write(&output, &png).await?;
            info!(path = %output, bytes = png.len(), "Debug image written");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = parse_args(&args) else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let config = match std::env::var_os("TEXTRACT_OVERLAY_CONFIG") {
        Some(path) => match AnalyzerConfig::load_from(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => AnalyzerConfig::load(),
    };
    init_logging(config.log_level);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(command, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert!(matches!(
            parse_args(&args(&["analyze", "form.png"])),
            Some(Command::Analyze { path }) if path == "form.png"
        ));
        assert!(matches!(
            parse_args(&args(&["debug-s3", "b", "k", "img.png", "out.png"])),
            Some(Command::DebugS3 { bucket, output, .. }) if bucket == "b" && output == "out.png"
        ));
        assert!(parse_args(&args(&["debug", "only-one"])).is_none());
        assert!(parse_args(&args(&[])).is_none());
    }
}
