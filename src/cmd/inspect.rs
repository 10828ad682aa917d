use crate::reports;
use clap::Args;
use posematch::config::Config;
use posematch::error::PoseMatchResult;
use posematch::mesh::load_mesh_from_file;

#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub mesh: String,
}

pub fn run(args: InspectArgs, config: &Config) -> PoseMatchResult<()> {
    let mesh = load_mesh_from_file(&args.mesh, config.session.joint_count)?;
    println!("\n📂 === ACTION MESH: {} === 📂", args.mesh);
    reports::print_mesh_summary(&mesh, config.scoring.visibility_threshold);
    Ok(())
}
