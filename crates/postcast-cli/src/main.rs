use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use postcast_core::{
    ChatCompletions, ContentStatus, Language, Pipeline, Provider, Sentiment, TranscriptCache,
    VideoReference, WhisperCli, YtDlpDownloader, export_srt,
};
use std::sync::Arc;

/// CLI wrapper for Provider enum (needed for clap ValueEnum)
#[derive(Clone, Default, ValueEnum)]
enum CliProvider {
    #[default]
    Gemini,
    Openai,
    Grok,
}

impl From<CliProvider> for Provider {
    fn from(cli: CliProvider) -> Self {
        match cli {
            CliProvider::Gemini => Provider::Gemini,
            CliProvider::Openai => Provider::Openai,
            CliProvider::Grok => Provider::Grok,
        }
    }
}

/// CLI wrapper for Language enum (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliLanguage {
    #[default]
    Pt,
    En,
    Es,
}

impl From<CliLanguage> for Language {
    fn from(cli: CliLanguage) -> Self {
        match cli {
            CliLanguage::Pt => Language::Pt,
            CliLanguage::En => Language::En,
            CliLanguage::Es => Language::Es,
        }
    }
}

#[derive(Parser)]
#[command(name = "postcast")]
#[command(
    about = "Transcribe video audio with Whisper and generate an AI-powered social media post"
)]
struct Cli {
    /// Video URL
    url: String,

    /// Transcription and analysis language
    #[arg(short, long, default_value = "pt")]
    lang: CliLanguage,

    /// AI provider for summaries, sentiment and the agent chain
    #[arg(short, long, default_value = "gemini")]
    provider: CliProvider,

    /// Force re-processing even if cached files exist
    #[arg(short, long)]
    force: bool,

    /// Export the transcript as a subtitle file to this path
    /// (defaults to the cache directory when given without a value)
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    srt: Option<PathBuf>,

    /// Run the agent chain and generate a social media post
    #[arg(long)]
    post: bool,

    /// Topic for the post (defaults to the extracted keyword)
    #[arg(short, long)]
    topic: Option<String>,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let provider: Provider = cli.provider.into();
    let language: Language = cli.lang.into();

    // Validate API key early
    if let Err(e) = provider.validate_api_key() {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    let video = VideoReference::parse(&cli.url)?;
    let cache = TranscriptCache::new(TranscriptCache::default_root());
    let pipeline = Pipeline::new(
        Arc::new(YtDlpDownloader),
        Arc::new(WhisperCli::default()),
        Arc::new(ChatCompletions::new(provider)),
        cache,
    );

    println!(
        "\n{}  {}\n",
        style("postcast").cyan().bold(),
        style("Video to Post").dim()
    );

    // Step 1: transcription pipeline with unified progress
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{bar:40.cyan/blue} {pos:>3}%  {msg}")
            .unwrap(),
    );
    bar.set_message("Downloading and transcribing...");
    let progress_bar = bar.clone();
    let transcript = pipeline
        .run_transcription(&cli.url, language, cli.force, move |value| {
            progress_bar.set_position(value as u64)
        })
        .await?;
    bar.finish_with_message("done");

    println!(
        "{} Transcribed: {} segments, {}",
        style("✓").green().bold(),
        transcript.segments.len(),
        style(&transcript.language).yellow()
    );
    for seg in &transcript.segments {
        println!(
            "{} {}",
            style(format!("[{:>7.2}s - {:>7.2}s]", seg.start, seg.end)).dim(),
            seg.text.trim()
        );
    }

    // Step 2: optional subtitle export
    if let Some(srt) = cli.srt {
        let path = if srt.as_os_str().is_empty() {
            pipeline.cache().srt_path(&video)
        } else {
            srt
        };
        let written = export_srt(&transcript, &path).await?;
        println!(
            "{} Subtitles written to {}",
            style("✓").green().bold(),
            style(written.display()).cyan()
        );
    }

    // Step 3: summary, sentiment and suggested topic
    let spinner = create_spinner("Analyzing transcript...");
    let status = pipeline.analyze(language).await;
    spinner.finish_and_clear();

    let suggested_topic = match status {
        ContentStatus::Waiting => {
            println!(
                "{} Transcript is empty, nothing to analyze",
                style("!").yellow().bold()
            );
            String::new()
        }
        ContentStatus::Ready(analysis) => {
            println!("\n{}", style("Summary").bold());
            if analysis.summary.is_empty() {
                println!("{}", style("(unavailable)").dim());
            } else {
                println!("{}", analysis.summary);
            }
            let sentiment = match analysis.sentiment {
                Sentiment::Positive => style("positive").green(),
                Sentiment::Negative => style("negative").red(),
                Sentiment::Neutral => style("neutral").yellow(),
                Sentiment::Unknown => style("unknown").dim(),
            };
            println!("\n{} {}", style("Sentiment:").bold(), sentiment);
            println!(
                "{} {}",
                style("Suggested topic:").bold(),
                style(&analysis.topic).cyan()
            );
            analysis.topic
        }
    };

    // Step 4: agent chain, only on explicit request
    if cli.post {
        let topic = cli.topic.unwrap_or(suggested_topic);
        if topic.trim().is_empty() {
            eprintln!(
                "{} No topic available; pass one with --topic",
                style("Error:").red().bold()
            );
            std::process::exit(1);
        }

        let spinner = create_spinner(&format!("Generating post about \"{topic}\"..."));
        let output = pipeline.generate_post(&topic).await;
        spinner.finish_and_clear();

        println!("\n{}", style("─".repeat(60)).dim());
        println!("{} {}\n", style("Post for topic:").bold(), style(&topic).cyan());
        if !output.draft.is_empty() {
            println!("{}\n{}\n", style("Draft").bold(), output.draft);
        }
        if output.reviewed_post.is_empty() {
            println!(
                "{} Every agent stage came back empty; try again later",
                style("!").yellow().bold()
            );
        } else {
            println!("{}\n{}", style("Review").bold(), output.reviewed_post);
        }
    }

    Ok(())
}
