// SPDX-FileCopyrightText: 2026 Causerie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation builders shared by integration tests.

use causerie_core::ChatMessage;
use chrono::{Duration, TimeZone, Utc};

/// `count` alternating user/assistant text messages numbered from 0
/// ("message 0", "message 1", ...), one minute apart.
pub fn numbered_conversation(count: usize) -> Vec<ChatMessage> {
    let start = Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).single();
    (0..count)
        .map(|i| {
            let text = format!("message {i}");
            let mut message = if i % 2 == 0 {
                ChatMessage::user(text)
            } else {
                ChatMessage::assistant(text)
            };
            message.id = format!("m{i}");
            if let Some(start) = start {
                message.timestamp = start + Duration::minutes(i as i64);
            }
            message
        })
        .collect()
}

/// A short French exchange with durable facts (preference, budget, deadline).
pub fn french_planning_conversation() -> Vec<ChatMessage> {
    vec![
        ChatMessage::user("Bonjour, je prépare un voyage au Japon."),
        ChatMessage::assistant("Avec plaisir ! Quelles sont vos envies ?"),
        ChatMessage::user("Je préfère les petites auberges aux grands hôtels."),
        ChatMessage::assistant("Noté, les ryokan sont une bonne option."),
        ChatMessage::user("Mon budget est de 3000 euros pour deux semaines."),
        ChatMessage::assistant("C'est réaliste hors saison."),
        ChatMessage::user("Il faut que je rentre avant le 15 mai."),
        ChatMessage::assistant("Je propose un départ fin avril."),
    ]
}
