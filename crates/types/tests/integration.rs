//! Integration tests for types

#[cfg(test)]
mod tests {
    use arcade_types::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn descriptor(version: &str) -> TitleDescriptor {
        TitleDescriptor {
            id: TitleId::from("g1"),
            name: "Game One".into(),
            description: String::new(),
            picture_url: String::new(),
            download_url_by_platform: BTreeMap::from([(
                Platform::current(),
                "http://x/g1.zip".to_string(),
            )]),
            version_by_platform: BTreeMap::from([(Platform::current(), version.to_string())]),
        }
    }

    #[test]
    fn test_decide_install_when_absent() {
        let d = descriptor("2");
        assert_eq!(
            Decision::decide(None, &d, Platform::current()),
            Decision::Install
        );
    }

    #[test]
    fn test_decide_update_when_stale() {
        let d = descriptor("1.1");
        let marker = InstalledMarker::new(TitleId::from("g1"), "1.0");
        let decision = Decision::decide(Some(&marker), &d, Platform::current());
        assert_eq!(decision, Decision::Update);
        assert!(decision.needs_download());
    }

    #[test]
    fn test_decide_launch_when_current() {
        let d = descriptor("1.1");
        let marker = InstalledMarker::new(TitleId::from("g1"), "1.1");
        let decision = Decision::decide(Some(&marker), &d, Platform::current());
        assert_eq!(decision, Decision::Launch);
        assert!(!decision.needs_download());
    }

    #[test]
    fn test_marker_wire_shape() {
        let marker = InstalledMarker::new(TitleId::from("g1"), "2");
        let json = serde_json::to_string(&marker).unwrap();
        assert_eq!(json, r#"{"id":"g1","version":"2"}"#);
    }

    #[test]
    fn test_platform_serialization() {
        let json = serde_json::to_string(&Platform::MacOs).unwrap();
        assert_eq!(json, r#""mac""#);
    }

    proptest! {
        #[test]
        fn percentage_is_bounded(done in any::<u64>(), total in any::<u64>()) {
            let pct = percentage(done, total);
            prop_assert!(pct <= 100);
            if total == 0 {
                prop_assert_eq!(pct, 0);
            }
        }

        #[test]
        fn percentage_is_floor(total in 1u64..1_000_000, frac in 0u64..=1000) {
            let done = total * frac / 1000;
            let expected = u8::try_from(done * 100 / total).unwrap();
            prop_assert_eq!(percentage(done, total), expected);
        }

        #[test]
        fn percentage_is_monotonic(total in 1u64..10_000_000, a in any::<u32>(), b in any::<u32>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(percentage(u64::from(lo), total) <= percentage(u64::from(hi), total));
        }
    }
}
