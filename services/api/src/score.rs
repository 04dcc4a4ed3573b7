use clap::Args;
use receipt_points::config::AppConfig;
use receipt_points::error::AppError;
use receipt_points::intake::{
    PointsBreakdown, ReceiptPayload, ReceiptValidator, ScoringConfig, ScoringEngine,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding a single receipt
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Receipts the submitting user already owns (drives the promotion bonus)
    #[arg(long, default_value_t = 0)]
    pub(crate) prior_receipts: usize,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let scoring =
        ScoringConfig::default().with_promotion_limit(config.intake.promotion_receipt_limit);

    let raw = std::fs::read(&args.file)?;
    let breakdown = score_bytes(&raw, args.prior_receipts, scoring)?;

    println!("Receipt: {}", args.file.display());
    print!("{}", render_breakdown(&breakdown));
    Ok(())
}

pub(crate) fn score_bytes(
    raw: &[u8],
    prior_receipts: usize,
    config: ScoringConfig,
) -> Result<PointsBreakdown, AppError> {
    let payload: ReceiptPayload = serde_json::from_slice(raw)?;
    let validated = ReceiptValidator::new().validate(payload)?;
    let breakdown = ScoringEngine::new(config).score(&validated, prior_receipts)?;
    Ok(breakdown)
}

pub(crate) fn render_breakdown(breakdown: &PointsBreakdown) -> String {
    let mut out = String::new();
    for component in &breakdown.components {
        out.push_str(&format!(
            "- {:<26} {:>5}  {}\n",
            component.rule.label(),
            component.points,
            component.notes
        ));
    }
    out.push_str(&format!("Total points: {}\n", breakdown.total));
    out
}
