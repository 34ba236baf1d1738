//! Shutter command handlers.

use serde::Serialize;
use tabled::Tabled;

use mediola_core::{
    Coordinator, CoreError, GatewayConfig, Motion, Shutter, ShutterAction, ShutterFeature,
};

use crate::cli::{GlobalOpts, ShuttersArgs, ShuttersCommand};
use crate::error::CliError;
use crate::output;

// ── Views ───────────────────────────────────────────────────────────

/// Serializable view of a shutter with decoded fields filled in.
#[derive(Debug, Serialize)]
pub(crate) struct ShutterView {
    sid: String,
    name: String,
    #[serde(rename = "type")]
    family: &'static str,
    adr: String,
    state: String,
    manufacturer: &'static str,
    model: String,
    position: Option<u8>,
    cover_position: Option<u8>,
    is_closed: Option<bool>,
    motion: Option<Motion>,
    features: Vec<ShutterFeature>,
}

impl From<&Shutter> for ShutterView {
    fn from(s: &Shutter) -> Self {
        Self {
            sid: s.sid.clone(),
            name: s.name(),
            family: s.family.tag(),
            adr: s.adr.clone(),
            state: s.state.clone(),
            manufacturer: s.manufacturer(),
            model: s.model(),
            position: s.position().value(),
            cover_position: s.cover_position(),
            is_closed: s.is_closed(),
            motion: s.motion(),
            features: s.features(),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct ShutterRow {
    #[tabled(rename = "SID")]
    sid: String,
    #[tabled(rename = "Type")]
    family: String,
    #[tabled(rename = "Address")]
    adr: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Position")]
    position: String,
    #[tabled(rename = "Cover")]
    cover: String,
    #[tabled(rename = "Motion")]
    motion: String,
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
}

impl From<&ShutterView> for ShutterRow {
    fn from(v: &ShutterView) -> Self {
        Self {
            sid: v.sid.clone(),
            family: v.family.into(),
            adr: v.adr.clone(),
            state: v.state.clone(),
            position: percent(v.position),
            cover: percent(v.cover_position),
            motion: v.motion.map_or_else(|| "-".into(), |m| m.to_string()),
            manufacturer: v.manufacturer.into(),
        }
    }
}

fn percent(value: Option<u8>) -> String {
    value.map_or_else(|| "-".into(), |p| format!("{p}%"))
}

fn detail(v: &ShutterView) -> String {
    let closed = match v.is_closed {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    };
    let features: Vec<String> = v.features.iter().map(ToString::to_string).collect();
    [
        format!("SID:          {}", v.sid),
        format!("Name:         {}", v.name),
        format!("Type:         {}", v.family),
        format!("Address:      {}", v.adr),
        format!("State:        {}", v.state),
        format!("Position:     {}", percent(v.position)),
        format!("Cover:        {}", percent(v.cover_position)),
        format!("Closed:       {closed}"),
        format!(
            "Motion:       {}",
            v.motion.map_or_else(|| "-".into(), |m| m.to_string())
        ),
        format!("Manufacturer: {}", v.manufacturer),
        format!("Model:        {}", v.model),
        format!("Features:     {}", features.join(", ")),
    ]
    .join("\n")
}

/// Render a list of shutters in the selected output format.
pub(crate) fn render_shutters(global: &GlobalOpts, shutters: &[Shutter]) -> String {
    let views: Vec<ShutterView> = shutters.iter().map(ShutterView::from).collect();
    output::render_list(&global.output, &views, |v| ShutterRow::from(v), |v| v.sid.clone())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    config: GatewayConfig,
    args: ShuttersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ShuttersCommand::List => {
            let shutters =
                Coordinator::oneshot(config, |c| async move { Ok(c.get_states()) }).await?;
            output::print_output(&render_shutters(global, &shutters), global.quiet);
            Ok(())
        }

        ShuttersCommand::Get { sid } => {
            let shutter = Coordinator::oneshot(config, |c| async move {
                c.shutter(&sid).ok_or(CoreError::ShutterNotFound { sid })
            })
            .await?;
            let view = ShutterView::from(&shutter);
            let out = output::render_single(&global.output, &view, detail, |v| v.sid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ShuttersCommand::Open { sid } => run_single(config, sid, ShutterAction::Open, global).await,
        ShuttersCommand::Close { sid } => {
            run_single(config, sid, ShutterAction::Close, global).await
        }
        ShuttersCommand::Stop { sid } => run_single(config, sid, ShutterAction::Stop, global).await,
        ShuttersCommand::Position { sid, percent } => {
            run_single(config, sid, ShutterAction::SetPosition(percent), global).await
        }

        ShuttersCommand::OpenAll => {
            run_all(config, "open", global, |c| async move { c.open_all().await }).await
        }
        ShuttersCommand::CloseAll => {
            run_all(config, "close", global, |c| async move { c.close_all().await }).await
        }
        ShuttersCommand::StopAll => {
            run_all(config, "stop", global, |c| async move { c.stop_all().await }).await
        }
    }
}

async fn run_single(
    config: GatewayConfig,
    sid: String,
    action: ShutterAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let target = sid.clone();
    let accepted =
        Coordinator::oneshot(config, |c| async move { c.command(&target, action).await }).await?;

    if !accepted {
        return Err(CliError::Rejected {
            action: action.name().into(),
            sid,
        });
    }

    if !global.quiet {
        let color = output::should_color(&global.color);
        eprintln!("{} Sent {} to shutter '{sid}'", output::check_mark(color), action.name());
    }
    Ok(())
}

/// Run a group command; reports how many shutters acknowledged it.
async fn run_all<F, Fut>(
    config: GatewayConfig,
    action: &str,
    global: &GlobalOpts,
    f: F,
) -> Result<(), CliError>
where
    F: FnOnce(Coordinator) -> Fut,
    Fut: Future<Output = usize>,
{
    let (accepted, total) = Coordinator::oneshot(config, |c| async move {
        let total = c.snapshot().len();
        Ok((f(c).await, total))
    })
    .await?;

    if !global.quiet {
        let color = output::should_color(&global.color);
        let mark = if accepted == total {
            output::check_mark(color)
        } else {
            output::cross_mark(color)
        };
        eprintln!("{mark} {action} accepted by {accepted} of {total} shutters");
    }
    Ok(())
}
