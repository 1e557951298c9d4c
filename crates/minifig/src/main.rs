use anyhow::{bail, Context, Result};
use assembly::{Frame, Model, Pose};
use glam::{DMat3, DVec3};

/// Command-line options
#[derive(Debug, Default)]
struct Args {
    /// Pose description (JSON); built-in default pose when absent
    pose: Option<String>,
    /// Offset of the whole figure group
    at: Option<DVec3>,
    /// Emit records as a JSON array instead of LDraw lines
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minifig=info".into()),
        )
        .init();

    if let Err(e) = run() {
        tracing::error!("{e:#}");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = parse_args(std::env::args().skip(1))?;
    let pose = load_pose(args.pose.as_deref())?;
    print!("{}", render(&pose, &args)?);
    Ok(())
}

/// Read a pose file, or fall back to the built-in pose.
fn load_pose(path: Option<&str>) -> Result<Pose> {
    let Some(path) = path else {
        return Ok(Pose::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pose file {path}"))?;
    let pose = Pose::from_json(&json)
        .with_context(|| format!("Failed to parse pose JSON from {path}"))?;
    tracing::info!("Loaded pose from {path}");
    Ok(pose)
}

/// Assemble `pose` into a group at `--at` and format the output, ending
/// with a newline.
fn render(pose: &Pose, args: &Args) -> Result<String> {
    let mut model = Model::new();
    let group = model.add_group(Frame::new(args.at.unwrap_or(DVec3::ZERO), DMat3::IDENTITY));
    let placed = pose.assemble(&mut model, Some(group))?;
    tracing::info!("Placed {} pieces", placed.len());

    let body = if args.json {
        serde_json::to_string_pretty(&model.group_records(group)?)?
    } else {
        model.render_group(group)?
    };
    Ok(format!("{body}\n"))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args> {
    let mut parsed = Args::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--pose" => {
                let path = args.next().context("--pose needs a file path")?;
                parsed.pose = Some(path);
            }
            "--at" => {
                let value = args.next().context("--at needs x,y,z")?;
                parsed.at = Some(parse_vector(&value)?);
            }
            "--json" => parsed.json = true,
            other => bail!("Unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

fn parse_vector(value: &str) -> Result<DVec3> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid coordinate '{p}' in '{value}'"))
        })
        .collect::<Result<_>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        _ => bail!("Expected three comma-separated coordinates, got '{value}'"),
    }
}
