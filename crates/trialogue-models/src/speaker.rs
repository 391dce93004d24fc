//! Speaker identities and the fixed rotation order.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A participant in the conversation.
///
/// Three speakers take turns in a fixed cycle: the moderator opens and
/// steers, then the two agents respond in order. `User` is the distinguished
/// injection identity; it can appear in the history but never occupies a
/// rotation slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The moderator that opens and steers the conversation.
    Moderator,
    /// First dialogue agent.
    AgentA,
    /// Second dialogue agent.
    AgentB,
    /// Human-injected message; not part of the rotation.
    User,
}

/// Static, read-only profile for a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeakerProfile {
    /// Display label used in transcripts and prompts.
    pub label: &'static str,
    /// Voice identifier passed to the speech-synthesis service.
    pub voice: &'static str,
}

impl Speaker {
    /// Rotation-bearing speakers, in rotation order.
    pub const ROTATION: [Speaker; 3] = [Speaker::Moderator, Speaker::AgentA, Speaker::AgentB];

    /// Profile lookup into the static speaker table.
    pub fn profile(&self) -> SpeakerProfile {
        match self {
            Speaker::Moderator => SpeakerProfile {
                label: "Moderator",
                voice: "ash",
            },
            Speaker::AgentA => SpeakerProfile {
                label: "Agent A",
                voice: "alloy",
            },
            Speaker::AgentB => SpeakerProfile {
                label: "Agent B",
                voice: "verse",
            },
            Speaker::User => SpeakerProfile {
                label: "User",
                voice: "alloy",
            },
        }
    }

    /// Display label for transcripts.
    pub fn label(&self) -> &'static str {
        self.profile().label
    }

    /// Voice identifier for synthesis.
    pub fn voice(&self) -> &'static str {
        self.profile().voice
    }

    /// The speaker that follows this one in the fixed 3-cycle.
    ///
    /// `User` is not part of the rotation; the cycle restarts at the first
    /// agent after a user message, matching the behavior after a moderator
    /// turn.
    pub fn next_in_rotation(&self) -> Speaker {
        match self {
            Speaker::Moderator => Speaker::AgentA,
            Speaker::AgentA => Speaker::AgentB,
            Speaker::AgentB => Speaker::Moderator,
            Speaker::User => Speaker::AgentA,
        }
    }

    /// Whether this speaker consumes a rotation slot.
    pub fn is_rotating(&self) -> bool {
        !matches!(self, Speaker::User)
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycle() {
        assert_eq!(Speaker::Moderator.next_in_rotation(), Speaker::AgentA);
        assert_eq!(Speaker::AgentA.next_in_rotation(), Speaker::AgentB);
        assert_eq!(Speaker::AgentB.next_in_rotation(), Speaker::Moderator);
    }

    #[test]
    fn test_user_restarts_cycle_without_rotating() {
        assert!(!Speaker::User.is_rotating());
        assert_eq!(Speaker::User.next_in_rotation(), Speaker::AgentA);
    }

    #[test]
    fn test_rotation_closes_over_three_speakers() {
        let mut speaker = Speaker::Moderator;
        for _ in 0..3 {
            speaker = speaker.next_in_rotation();
        }
        assert_eq!(speaker, Speaker::Moderator);
    }

    #[test]
    fn test_profiles() {
        assert_eq!(Speaker::Moderator.label(), "Moderator");
        assert_eq!(Speaker::AgentA.voice(), "alloy");
        assert_eq!(Speaker::AgentB.voice(), "verse");
    }
}
