//! Wire protocol for the smilepet session server.
//!
//! Every frame, inbound and outbound, is a flat JSON object with a
//! required `type` discriminator. Field names follow the server's wire
//! format exactly (`client_id` snake_case, `isMeetingActive` camelCase);
//! per-field renames carry the mismatch so Rust code stays idiomatic.

use serde::{Deserialize, Serialize};

/// Frames this client sends to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientFrame {
    /// First frame on every (re)connection; binds the socket to a
    /// nickname before any other traffic is accepted.
    #[serde(rename = "init")]
    Init { nickname: String },

    #[serde(rename = "message")]
    Chat {
        client_id: String,
        nickname: String,
        text: String,
    },

    #[serde(rename = "smilePoint")]
    SmilePoint {
        client_id: String,
        nickname: String,
        point: u32,
    },

    #[serde(rename = "idea")]
    Idea { client_id: String, nickname: String },

    #[serde(rename = "meetingStatus")]
    MeetingStatus {
        client_id: String,
        nickname: String,
        #[serde(rename = "isMeetingActive")]
        is_meeting_active: bool,
    },

    /// Request a new pet animal type. The server only honors this while
    /// the meeting is inactive, and re-broadcasts the current value
    /// either way.
    #[serde(rename = "imageAnimalType")]
    AnimalType {
        client_id: String,
        nickname: String,
        #[serde(rename = "imageAnimalType")]
        animal_type: String,
    },
}

/// Frames the server broadcasts to every participant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerFrame {
    #[serde(rename = "message")]
    Chat {
        timestamp: String,
        nickname: String,
        text: String,
    },

    /// Authoritative shared score. Last write wins; the client never
    /// accumulates this locally.
    #[serde(rename = "smilePoint")]
    SmilePoint {
        #[serde(rename = "totalSmilePoint")]
        total_smile_point: u64,
    },

    #[serde(rename = "clientsList")]
    ClientsList {
        #[serde(rename = "clientsList")]
        clients_list: Vec<String>,
    },

    #[serde(rename = "idea")]
    Idea {
        #[serde(rename = "totalIdeas")]
        total_ideas: u64,
    },

    #[serde(rename = "imageUrl")]
    ImageUrl {
        #[serde(rename = "imageUrl")]
        image_url: String,
    },

    #[serde(rename = "level")]
    Level { level: u32 },

    #[serde(rename = "timer")]
    Timer { timer: String },

    #[serde(rename = "meetingStatus")]
    MeetingStatus {
        #[serde(rename = "isMeetingActive")]
        is_meeting_active: bool,
    },

    /// Current pet animal type; pushed to every new client and
    /// re-broadcast after each change request.
    #[serde(rename = "imageAnimalType")]
    AnimalType {
        #[serde(rename = "imageAnimalType")]
        animal_type: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_frame_wire_shape() {
        let frame = ClientFrame::Init {
            nickname: "alice".into(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert_eq!(json["type"], "init");
        assert_eq!(json["nickname"], "alice");
    }

    #[test]
    fn smile_point_frame_wire_shape() {
        let frame = ClientFrame::SmilePoint {
            client_id: "c-1".into(),
            nickname: "alice".into(),
            point: 10,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert_eq!(json["type"], "smilePoint");
        assert_eq!(json["client_id"], "c-1");
        assert_eq!(json["point"], 10);
    }

    #[test]
    fn meeting_status_uses_camel_case_flag() {
        let frame = ClientFrame::MeetingStatus {
            client_id: "c-1".into(),
            nickname: "alice".into(),
            is_meeting_active: true,
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert_eq!(json["type"], "meetingStatus");
        assert_eq!(json["isMeetingActive"], true);
        assert!(json.get("is_meeting_active").is_none());
    }

    #[test]
    fn parses_inbound_frames() {
        let frame: ServerFrame =
            serde_json::from_str(r#"{"type":"smilePoint","totalSmilePoint":42}"#).unwrap();
        assert_eq!(
            frame,
            ServerFrame::SmilePoint {
                total_smile_point: 42
            }
        );

        let frame: ServerFrame =
            serde_json::from_str(r#"{"type":"clientsList","clientsList":["alice","alice","bob"]}"#)
                .unwrap();
        assert_eq!(
            frame,
            ServerFrame::ClientsList {
                clients_list: vec!["alice".into(), "alice".into(), "bob".into()]
            }
        );

        let frame: ServerFrame =
            serde_json::from_str(r#"{"type":"meetingStatus","isMeetingActive":false}"#).unwrap();
        assert_eq!(
            frame,
            ServerFrame::MeetingStatus {
                is_meeting_active: false
            }
        );

        let frame: ServerFrame = serde_json::from_str(
            r#"{"type":"message","timestamp":"12:00:00","nickname":"bob","text":"hi"}"#,
        )
        .unwrap();
        assert!(matches!(frame, ServerFrame::Chat { .. }));

        let frame: ServerFrame =
            serde_json::from_str(r#"{"type":"imageAnimalType","imageAnimalType":"red panda"}"#)
                .unwrap();
        assert_eq!(
            frame,
            ServerFrame::AnimalType {
                animal_type: "red panda".into()
            }
        );
    }

    #[test]
    fn animal_type_frame_wire_shape() {
        let frame = ClientFrame::AnimalType {
            client_id: "c-1".into(),
            nickname: "alice".into(),
            animal_type: "shiba inu".into(),
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&frame).unwrap()).unwrap();
        assert_eq!(json["type"], "imageAnimalType");
        assert_eq!(json["imageAnimalType"], "shiba inu");
        assert!(json.get("animal_type").is_none());
    }

    #[test]
    fn unknown_type_fails_to_parse() {
        let result = serde_json::from_str::<ServerFrame>(r#"{"type":"confetti","count":3}"#);
        assert!(result.is_err());
    }

    #[test]
    fn malformed_payload_fails_to_parse() {
        let result = serde_json::from_str::<ServerFrame>(r#"{"type":"level","level":"three"}"#);
        assert!(result.is_err());
    }
}
