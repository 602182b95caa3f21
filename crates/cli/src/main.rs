use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tickersense_core::analysis::SentimentAnalyzer;
use tickersense_core::llm::openai_compat::ChatCompletionsClient;
use tickersense_core::news::gnews::GNewsClient;
use tickersense_core::report::{
    analyze_stock, normalize_stock, AnalysisReport, DecisionHint, SignalClass,
    DEFAULT_MAX_ARTICLES,
};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const PREVIEW_ARTICLES: usize = 3;
const TITLE_PREVIEW_CHARS: usize = 80;
const DESCRIPTION_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Parser)]
#[command(name = "tickersense_cli", about = "News sentiment analysis for a stock")]
struct Args {
    /// Stock symbol or company name (e.g. AAPL, Tesla, TCS).
    stock: String,

    /// Number of news articles to fetch.
    #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES)]
    max_articles: usize,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tickersense_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let stock = normalize_stock(&args.stock).context("stock must not be blank")?;

    let news = GNewsClient::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;
    let llm = ChatCompletionsClient::from_settings(&settings).inspect_err(|e| {
        sentry_anyhow::capture_anyhow(e);
    })?;
    let analyzer = SentimentAnalyzer::new(Arc::new(llm));

    let Some(report) = analyze_stock(&news, &analyzer, &stock, args.max_articles.max(1)).await
    else {
        anyhow::bail!("could not fetch news articles for {stock}; try a different stock symbol");
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }
    Ok(())
}

fn render_text(report: &AnalysisReport) -> String {
    let v = &report.verdict;
    let mut out = String::new();

    out.push_str(&format!("Latest news for {}\n", report.stock));
    for article in report.articles.iter().take(PREVIEW_ARTICLES) {
        out.push_str(&format!(
            "  - {}... [{}]\n    {}...\n",
            preview(&article.title, TITLE_PREVIEW_CHARS),
            article.source,
            preview(&article.description, DESCRIPTION_PREVIEW_CHARS)
        ));
    }

    out.push_str(&format!(
        "\nSentiment score: {:.2} ({})\nRecommendation: {}\nConfidence: {}%\nSignal: {} {}\n",
        v.sentiment_score,
        v.sentiment_label,
        v.recommendation,
        v.confidence,
        signal_marker(report.signal),
        v.sentiment_label
    ));

    out.push_str("\nKey insights:\n");
    for insight in &v.key_insights {
        out.push_str(&format!("  + {insight}\n"));
    }
    out.push_str("Risk factors:\n");
    for risk in &v.risks {
        out.push_str(&format!("  ! {risk}\n"));
    }

    out.push_str(&format!("\nSummary: {}\n", v.summary));

    let advice = match report.decision {
        DecisionHint::ConsiderInvesting => format!(
            "Based on current news sentiment, {} shows positive signals. Always do your own research before investing!",
            report.stock
        ),
        DecisionHint::CautionAdvised => format!(
            "Current news sentiment for {} is concerning. Consider waiting for better market conditions.",
            report.stock
        ),
        DecisionHint::FurtherResearch => format!(
            "The sentiment for {} is mixed or uncertain. Monitor the stock for clearer signals.",
            report.stock
        ),
    };
    out.push_str(&format!(
        "\n{}: {}\n  Recommendation: {}, confidence: {}%\n",
        report.decision.headline(),
        advice,
        v.recommendation,
        v.confidence
    ));

    out.push_str(
        "\nDisclaimer: for educational purposes only. Not financial advice.\n",
    );
    out
}

fn signal_marker(signal: SignalClass) -> &'static str {
    match signal {
        SignalClass::Bullish => "[+]",
        SignalClass::Neutral => "[=]",
        SignalClass::Bearish => "[-]",
    }
}

fn preview(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

fn init_sentry(settings: &tickersense_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
