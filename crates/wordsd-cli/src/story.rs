//! The bundled scene: the first night in a new flat.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use tracing::info;
use wordsd_core::{DialogHandle, MessageStyle};

/// Options offered after the opening, in display order.
pub const CHOICES: [&str; 2] = ["Unpack the kitchen boxes", "Leave it all and go to bed"];

const OPENING: &[&str] = &[
    "The last box hits the floor of the flat with a hollow thud.",
    "The movers are gone. The stairwell light clicks off on its own.",
    "Everything you own fits in eleven cardboard boxes and a lamp with no shade.",
    "It is almost midnight.",
];

const KITCHEN: &[&str] = &[
    "You cut the tape on the box marked KITCHEN.",
    "Two plates. One of them chipped.",
    "A kettle with somebody else's limescale.",
    "Forks, knives, a single wooden spoon.",
    "A tin of coffee you do not remember buying.",
    "The drawers stick. The third one will not open at all.",
    "You line the mugs up on the counter, handles all facing left.",
    "Somewhere below, a door closes very gently.",
    "You stack the empty boxes by the window.",
    "Outside, the street lamp flickers twice and steadies.",
    "The kitchen smells of cardboard and old paint.",
    "It almost looks like someone lives here now.",
    "The third drawer is open.",
];

const BEDROOM: &[&str] = &[
    "You drag the mattress into the smaller room and drop onto it fully dressed.",
    "The radiator ticks as it cools.",
    "Across the room the wardrobe door stands open a hand's width.",
];

const ENDING: &[&str] = &[
    "Eventually, sleep comes anyway.",
    "In the morning none of it seems quite so strange.",
];

/// Illustrative game state. The engine never sees it.
#[derive(Debug)]
struct Night {
    sanity: i32,
    unpacked: bool,
}

/// Plays the whole scene against `dialog`.
///
/// # Errors
/// Returns an error if the engine stops before the scene ends.
pub async fn move_in_night(dialog: DialogHandle) -> Result<()> {
    let mut night = Night {
        sanity: 10,
        unpacked: false,
    };

    dialog.reset_transcript()?;
    dialog.set_recording(true)?;

    dialog.show_with("Night 1", MessageStyle::Hint).await?;
    say_all(&dialog, OPENING).await?;

    let picked = choose(&dialog, "What now?", &CHOICES).await?;
    dialog.clear().await?;

    if picked == 0 {
        night.unpacked = true;
        // Long enough to run past the bottom of the board.
        say_all(&dialog, KITCHEN).await?;
        dialog
            .say("You did not open it.", MessageStyle::Warning)
            .await?;
        night.sanity -= 2;
    } else {
        say_all(&dialog, BEDROOM).await?;
        dialog
            .say(
                "Something inside the wardrobe is breathing.",
                MessageStyle::Warning,
            )
            .await?;
        night.sanity -= 3;
    }

    dialog.clear().await?;
    say_all(&dialog, ENDING).await?;
    dialog
        .show_with(
            "End of the first night. Scroll up to read it again.",
            MessageStyle::Hint,
        )
        .await?;
    dialog.wait_for_ack().await?;

    info!(sanity = night.sanity, unpacked = night.unpacked, "scene finished");
    Ok(())
}

async fn say_all(dialog: &DialogHandle, lines: &[&str]) -> Result<()> {
    for line in lines {
        dialog.say(*line, MessageStyle::Normal).await?;
    }
    Ok(())
}

/// Shows `prompt` and one clickable entry per option, then waits until one
/// is pressed. Returns the index of the pressed option.
async fn choose(dialog: &DialogHandle, prompt: &str, options: &[&str]) -> Result<usize> {
    dialog.show_with(prompt, MessageStyle::Hint).await?;

    // 0 until an option is pressed, then its 1-based position.
    let picked = Arc::new(AtomicUsize::new(0));
    for (i, option) in options.iter().enumerate() {
        let picked = Arc::clone(&picked);
        dialog
            .show_clickable(*option, move || {
                // First press wins.
                let _ = picked.compare_exchange(0, i + 1, Ordering::SeqCst, Ordering::SeqCst);
            })
            .await?;
    }

    let seen = Arc::clone(&picked);
    dialog
        .wait_for(move || seen.load(Ordering::SeqCst) != 0)
        .await?;

    let choice = picked.load(Ordering::SeqCst) - 1;
    info!(choice, option = options[choice], "choice made");
    Ok(choice)
}
