use anyhow::{Context, bail};
use clap::Parser;
use intake::Reason;
use kiosk::{CheckInForm, FormPostTransport, Outcome, RelayTransport, Submission};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Submit a clinic check-in from the command line")]
struct Args {
    /// new, existing or walkin
    #[arg(long)]
    kind: Option<String>,

    #[arg(long, default_value = "scheduled", value_parser = parse_reason)]
    reason: Reason,

    #[arg(long)]
    name: String,

    #[arg(long)]
    phone: String,

    #[arg(long, default_value = "")]
    other_reason: String,

    #[arg(long, default_value = "")]
    product_name: String,

    #[arg(long, default_value = "")]
    notes: String,

    #[arg(long, env = "KIOSK_RELAY_URL", default_value = "http://localhost:1111/checkin")]
    relay_url: String,

    #[arg(long, env = "GAS_PUBLIC_URL")]
    fallback_url: String,
}

fn parse_reason(value: &str) -> Result<Reason, String> {
    value.parse().map_err(|()| {
        let options: Vec<_> = Reason::ALL.iter().map(|reason| reason.as_str()).collect();
        format!("expected one of {}", options.join(", "))
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let mut form = CheckInForm::preselect(args.kind.as_deref());
    form.reason = args.reason;
    form.name = args.name;
    form.phone = args.phone;
    form.other_reason = args.other_reason;
    form.product_name = args.product_name;
    form.notes = args.notes;

    let mut submission = Submission::new(
        form,
        RelayTransport::new(args.relay_url),
        FormPostTransport::new(args.fallback_url),
    );

    let outcome = submission.submit().await;
    let message = submission.status().message();

    match outcome {
        Outcome::Invalid(errors) => {
            for (field, error) in errors.fields() {
                eprintln!("{}: {error}", field.as_str());
            }
            bail!("check-in not submitted");
        }
        Outcome::Sent {
            return_home_after, ..
        } => {
            println!("{}", message.context("no status message after success")?);
            tokio::time::sleep(return_home_after).await;
        }
        Outcome::Failed(e) => {
            eprintln!("{}", message.context("no status message after failure")?);
            return Err(e.into());
        }
    }

    Ok(())
}
