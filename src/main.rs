//! Snowbrawl entry point
//!
//! Headless demo host: loads the sample roster, runs the simulation with the
//! built-in autoplayer, logs the sound cues a real host would play, and
//! prints a JSON summary of the run. Pass a seed as the first argument to
//! replay a specific encounter.

use snowbrawl::consts::TICK_RATE;
use snowbrawl::roster::Roster;
use snowbrawl::sim::{GameEvent, GameState, TickInput, tick};

/// Sample roster in the text format: one calorie value per line, blank line
/// between groups. The 56873-calorie group is the unique maximum, so it
/// produces the boss.
const SAMPLE_ROSTER: &str = "\
9686
10178
3375
9638
6318
4978
5988
6712

7263
8104
5521

12045
9930

3001
4350
2200
1980

15000
14890
9120

8888
7777

21034
18002

5125

10000
10001
10002

2500
2600
2700
2800
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(2022);

    let roster = Roster::parse(SAMPLE_ROSTER)?;
    log::info!(
        "roster loaded: {} groups, max {} calories",
        roster.len(),
        roster.max_calories()
    );

    let mut state = GameState::new(seed, roster);
    let input = TickInput {
        demo: true,
        ..Default::default()
    };

    // Five simulated minutes, or until the boss falls
    let max_ticks = 5 * 60 * TICK_RATE as u64;
    for _ in 0..max_ticks {
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::Swing => log::debug!("swing"),
                GameEvent::Hit { calories } => {
                    log::info!("hit a {calories}-calorie bad guy");
                }
                GameEvent::Defeated { calories, boss: true } => {
                    log::info!("the big boy ({calories} calories) is down");
                }
                GameEvent::Defeated { calories, boss: false } => {
                    log::info!("defeated a {calories}-calorie bad guy");
                }
            }
        }
        if state.terminal {
            break;
        }
    }

    let summary = serde_json::json!({
        "seed": state.seed,
        "ticks": state.clock.now(),
        "boss_defeated": state.terminal,
        "bad_guys_left": state.bad_guys.len(),
        "groups_unspawned": state.roster_queue.len(),
        "biggest_seen": state.biggest_seen,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
