use base64::{engine::general_purpose, Engine as _};
use bgswap::{
    cancel_pair, logger, part_from_file, BackgroundEditRequest, EnhancementFlags, GeminiClient,
    GeminiConfig,
};
use std::env;
use std::fs;
use std::process;

fn usage() -> ! {
    eprintln!(
        "Usage: bgswap <original-image> [--background <image>] [--prompt <text>] [-n <1-4>]\n\
         \x20             [--keep-face] [--smooth-skin] [--remove-acne] [--sharpen]"
    );
    process::exit(2);
}

struct Args {
    original: String,
    background: Option<String>,
    prompt: String,
    count: usize,
    flags: EnhancementFlags,
}

fn parse_args() -> Args {
    let mut args = env::args().skip(1);
    let original = match args.next() {
        Some(path) if !path.starts_with("--") => path,
        _ => usage(),
    };

    let mut parsed = Args {
        original,
        background: None,
        prompt: String::new(),
        count: 1,
        flags: EnhancementFlags::default(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--background" => parsed.background = Some(args.next().unwrap_or_else(|| usage())),
            "--prompt" => parsed.prompt = args.next().unwrap_or_else(|| usage()),
            "-n" => {
                parsed.count = args
                    .next()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or_else(|| usage())
            }
            "--keep-face" => parsed.flags.keep_face = true,
            "--smooth-skin" => parsed.flags.smooth_skin = true,
            "--remove-acne" => parsed.flags.remove_acne = true,
            "--sharpen" => parsed.flags.sharpen = true,
            _ => usage(),
        }
    }

    parsed
}

fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(_) => eprintln!("No .env file found, using system environment variables"),
    }

    logger::init_with_config(
        logger::LoggerConfig::development().with_level(logger::LogLevel::Debug),
    )?;
    logger::log_startup_info("bgswap", env!("CARGO_PKG_VERSION"));

    let config = GeminiConfig::from_env();
    logger::log_config_info(&config);

    // Missing credential is fatal before anything else happens.
    let client = match GeminiClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to initialize Gemini client: {}", e);
            process::exit(1);
        }
    };

    let args = parse_args();
    if args.prompt.is_empty() && args.background.is_none() {
        log::error!("Provide a background description or a background image.");
        process::exit(2);
    }

    let _timer = logger::timer("background swap");

    let original = part_from_file(&args.original).await?;
    let mut request = BackgroundEditRequest::new(original)
        .with_prompt(&args.prompt)
        .with_flags(args.flags);
    if let Some(path) = &args.background {
        request = request.with_background(part_from_file(path).await?);
    }

    let (_cancel, token) = cancel_pair();
    let outcome = client.generate_batch(&request, args.count, &token).await;

    if !outcome.has_results() {
        log::error!(
            "No images could be generated ({} empty, {} failed). Please try again.",
            outcome.empty,
            outcome.failed
        );
        process::exit(1);
    }

    for (index, image) in outcome.images.iter().enumerate() {
        let path = format!(
            "bgswap-generated-{}.{}",
            index + 1,
            extension_for(&image.mime_type)
        );
        let bytes = general_purpose::STANDARD.decode(&image.data)?;
        fs::write(&path, bytes)?;
        log::info!(
            "Saved {} ({} bytes as data URI: {})",
            path,
            image.data.len(),
            image.data_uri().len()
        );
    }

    Ok(())
}
