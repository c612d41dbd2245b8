//! 参与者实体定义

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::value_objects::{ParticipantName, Timestamp};

/// 房间中的活跃参与者
///
/// 名称即身份标识，同一时刻同名参与者最多一个。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub name: ParticipantName,
    /// 最近一次心跳时间
    pub last_seen: Timestamp,
}

impl Participant {
    pub fn new(name: ParticipantName, now: Timestamp) -> Self {
        Self {
            name,
            last_seen: now,
        }
    }

    /// 刷新心跳时间
    pub fn touch(&mut self, now: Timestamp) {
        self.last_seen = now;
    }

    /// 距离上次心跳是否已严格超过超时阈值
    pub fn is_stale(&self, now: Timestamp, timeout: Duration) -> bool {
        now - self.last_seen > timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_staleness_is_strictly_greater_than_timeout() {
        let participant = Participant::new(ParticipantName::parse("A").unwrap(), at(0));
        let timeout = Duration::seconds(10);

        assert!(!participant.is_stale(at(10), timeout));
        assert!(participant.is_stale(at(11), timeout));
    }

    #[test]
    fn test_touch_moves_last_seen_forward() {
        let mut participant = Participant::new(ParticipantName::parse("A").unwrap(), at(0));
        participant.touch(at(5));
        assert_eq!(participant.last_seen, at(5));
        assert!(!participant.is_stale(at(15), Duration::seconds(10)));
    }

    #[test]
    fn test_participant_serializes_with_camel_case_fields() {
        let participant = Participant::new(ParticipantName::parse("A").unwrap(), at(0));
        let json = serde_json::to_value(&participant).unwrap();
        assert_eq!(json["name"], "A");
        assert!(json.get("lastSeen").is_some());
    }
}
