//! Purpose-based topic routing.
//!
//! A node exposing several controllable channels (a bulb's on/off state and its color, say)
//! subscribes to one topic per channel. Each topic ends with the channel's purpose, so inbound
//! messages are matched to a handler by the purpose the topic ends with.

/// Find which of `purposes` `topic` is addressed to.
///
/// A topic matches a purpose when it ends with it, ignoring trailing `/`. The first matching
/// purpose wins. Returns `None` for a topic that matches no purpose; the caller decides how to
/// report it.
///
/// ```
/// # use myrtio_mqtt_session::routing::match_purpose;
/// let purposes = ["state", "color"];
/// assert_eq!(match_purpose("/device/00124b/bulb/color/", &purposes), Some("color"));
/// assert_eq!(match_purpose("/device/00124b/bulb/state", &purposes), Some("state"));
/// assert_eq!(match_purpose("/device/00124b/fan/speed/", &purposes), None);
/// ```
pub fn match_purpose<'p>(topic: &str, purposes: &[&'p str]) -> Option<&'p str> {
    let topic = topic.trim_end_matches('/');
    purposes
        .iter()
        .copied()
        .find(|purpose| !purpose.is_empty() && topic.ends_with(purpose))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PURPOSES: [&str; 2] = ["state", "color"];

    #[test]
    fn matches_trailing_purpose() {
        assert_eq!(
            match_purpose("/device/00124b00060db21f/bulb/state/", &PURPOSES),
            Some("state")
        );
        assert_eq!(match_purpose("home/bulb/color", &PURPOSES), Some("color"));
        assert_eq!(match_purpose("home/bulb/color///", &PURPOSES), Some("color"));
    }

    #[test]
    fn suffix_need_not_be_a_whole_segment() {
        assert_eq!(match_purpose("/device/x/bulb-color/", &PURPOSES), Some("color"));
    }

    #[test]
    fn purpose_must_end_the_topic() {
        assert_eq!(match_purpose("/state/brightness", &PURPOSES), None);
        assert_eq!(match_purpose("/device/x/bulb/colors/", &PURPOSES), None);
    }

    #[test]
    fn unknown_topic_matches_nothing() {
        assert_eq!(match_purpose("/device/x/fan/speed/", &PURPOSES), None);
        assert_eq!(match_purpose("", &PURPOSES), None);
        assert_eq!(match_purpose("/any/topic", &[""]), None);
    }
}
