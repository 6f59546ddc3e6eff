//! Level generation runner (default binary).
//!
//! Generates a level through the provider pipeline (remote backends when
//! credentials are present, deterministic fallback otherwise), prints the
//! wire payload, then plays it headlessly with a naive goal-seeking input to
//! show the score stream and completion event.

use anyhow::Result;

use puzzle_adventure::gen::{GenerateRequest, GenerationPipeline};
use puzzle_adventure::sim::{InputState, SimEvent, SimulationEngine};
use puzzle_adventure::types::{Direction, TICK_MS};

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let skill: u8 = args.next().and_then(|s| s.parse().ok()).unwrap_or(4);
    let theme = args.next().unwrap_or_else(|| "sci-fi".to_string());

    let pipeline = GenerationPipeline::from_env();
    let request = GenerateRequest::new(skill, &theme);
    let spec = pipeline.generate(&request).await;

    println!("{}", serde_json::to_string_pretty(&spec)?);

    let mut engine = SimulationEngine::new();
    if let Err(e) = engine.load(spec) {
        eprintln!("[Game] level rejected: {e}");
        return Ok(());
    }

    let goal = engine
        .entities()
        .iter()
        .find(|e| e.kind == puzzle_adventure::sim::EntityKind::Goal)
        .map(|e| e.position);

    // Greedy walk toward the goal; walls may dead-end it, so bound the run
    let mut ticks = 0u32;
    while engine.phase() == puzzle_adventure::types::Phase::Playing && ticks < 5000 {
        let mut input = InputState::none();
        if let Some(goal) = goal {
            let player = engine.player_position();
            if goal.x > player.x {
                input.press(Direction::Right);
            } else if goal.x < player.x {
                input.press(Direction::Left);
            }
            if goal.y > player.y {
                input.press(Direction::Down);
            } else if goal.y < player.y {
                input.press(Direction::Up);
            }
        }
        engine.tick(TICK_MS, &input);

        for event in engine.drain_events() {
            match event {
                SimEvent::ScoreUpdate(score) => println!("[Game] score {score}"),
                SimEvent::GameComplete => println!("[Game] level complete"),
                SimEvent::Error(reason) => eprintln!("[Game] error: {reason}"),
            }
        }
        ticks += 1;
    }

    if let Some(result) = engine.session_result("local-player") {
        println!("[Game] session result: {}", serde_json::to_string(&result)?);
    }

    Ok(())
}
