use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use posematch::feedback::{Feedback, FeedbackLabel};
use posematch::mesh::ActionMesh;
use posematch::scorer::ScoreDetails;
use posematch::session::{ScoreEvent, SessionStats};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn label_color(label: FeedbackLabel) -> Color {
    match label {
        FeedbackLabel::Perfect => Color::Green,
        FeedbackLabel::Great => Color::Cyan,
        FeedbackLabel::Good => Color::Blue,
        FeedbackLabel::Almost => Color::Yellow,
        FeedbackLabel::Encourage => Color::Red,
    }
}

pub fn print_score_details(d: &ScoreDetails, feedback: &Feedback) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    if d.shape_mismatch {
        table.add_row(vec![
            Cell::new("Shape").fg(Color::Red),
            Cell::new("MISMATCH").fg(Color::Red),
        ]);
    }

    table.add_row(vec![
        Cell::new("Final Score").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", d.final_score)).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Angular"),
        Cell::new(format!("{:.1}", d.angular_similarity)),
    ]);
    table.add_row(vec![
        Cell::new("Positional"),
        Cell::new(format!("{:.1}", d.positional_similarity)),
    ]);
    table.add_row(vec![
        Cell::new("Avg Angle Diff (deg)"),
        Cell::new(format!("{:.2}", d.avg_angle_diff)),
    ]);
    table.add_row(vec![
        Cell::new("Avg Distance"),
        Cell::new(format!("{:.4}", d.avg_distance)),
    ]);
    table.add_row(vec![
        Cell::new("Visible Joints"),
        Cell::new(d.visible_joints.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Compared Angles"),
        Cell::new(d.compared_angles.to_string()),
    ]);
    table.add_row(vec![
        Cell::new("Feedback").add_attribute(Attribute::Bold),
        Cell::new(format!("{} (+{})", feedback.label, feedback.points))
            .fg(label_color(feedback.label)),
    ]);
    println!("\n{}", table);
}

pub fn print_events(events: &[ScoreEvent]) {
    if events.is_empty() {
        println!("\nNo scores were emitted.");
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Playback").add_attribute(Attribute::Bold),
        Cell::new("Checkpoint"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Feedback"),
        Cell::new("Points").add_attribute(Attribute::Bold),
    ]);
    for i in [0, 1, 2, 4] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for e in events {
        table.add_row(vec![
            Cell::new(format!("{:.2}s", e.playback_time)),
            Cell::new(format!("{:.2}s", e.checkpoint_time)),
            Cell::new(format!("{:.1}", e.score)).fg(Color::Cyan),
            Cell::new(e.label.to_string()).fg(label_color(e.label)),
            Cell::new(format!("+{}", e.points)).add_attribute(Attribute::Bold),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_session_stats(s: &SessionStats) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Scored").fg(Color::Green),
        Cell::new("Missed").fg(Color::Red),
        Cell::new("Suppr"),
        Cell::new("NoCkpt"),
        Cell::new("NoPose"),
        Cell::new("Stale"),
        Cell::new("Fail"),
        Cell::new("Points").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new(s.scored).fg(Color::Green),
        Cell::new(s.missed).fg(Color::Red),
        Cell::new(s.suppressed),
        Cell::new(s.no_checkpoint),
        Cell::new(s.no_pose),
        Cell::new(s.stale),
        Cell::new(s.backend_failures),
        Cell::new(s.total_points).add_attribute(Attribute::Bold),
    ]);
    println!("\n{}", table);
}

pub fn print_mesh_summary(mesh: &ActionMesh, visibility_threshold: f32) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Checkpoints").add_attribute(Attribute::Bold),
        Cell::new("Start"),
        Cell::new("End"),
        Cell::new("Avg Gap"),
        Cell::new("Max Gap"),
        Cell::new("Joints"),
        Cell::new("Avg Visible"),
    ]);

    let cps = mesh.checkpoints();
    let gaps: Vec<f64> = cps.windows(2).map(|w| w[1].time - w[0].time).collect();
    let avg_gap = if gaps.is_empty() {
        0.0
    } else {
        gaps.iter().sum::<f64>() / gaps.len() as f64
    };
    let max_gap = gaps.iter().cloned().fold(0.0f64, f64::max);
    let avg_visible = if cps.is_empty() {
        0.0
    } else {
        cps.iter()
            .map(|c| c.landmarks.visible_count(visibility_threshold) as f64)
            .sum::<f64>()
            / cps.len() as f64
    };

    let fmt_time = |t: Option<f64>| t.map(|v| format!("{:.2}s", v)).unwrap_or_else(|| "-".to_string());

    table.add_row(vec![
        Cell::new(mesh.len()).add_attribute(Attribute::Bold),
        Cell::new(fmt_time(mesh.first_time())),
        Cell::new(fmt_time(mesh.last_time())),
        Cell::new(format!("{:.3}s", avg_gap)),
        Cell::new(format!("{:.3}s", max_gap)),
        Cell::new(mesh.joint_count().map(|j| j.to_string()).unwrap_or_else(|| "-".to_string())),
        Cell::new(format!("{:.1}", avg_visible)),
    ]);
    println!("\n{}", table);
}
