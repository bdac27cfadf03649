mod tests {
    use pwm_strip_controller::frame::Frame;
    use pwm_strip_controller::pattern::{MAX_FRAMES, PatternStore};

    fn numbered(n: usize) -> impl Iterator<Item = Frame> {
        (0..n).map(|i| [i as u8; 12])
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = PatternStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.frames().is_empty());
    }

    #[test]
    fn test_upload_sets_length_and_frames() {
        let mut store = PatternStore::new();
        assert_eq!(store.upload(numbered(3)), 3);
        assert_eq!(store.len(), 3);
        assert_eq!(store.frame_at(0), &[0; 12]);
        assert_eq!(store.frame_at(2), &[2; 12]);
    }

    #[test]
    fn test_upload_truncates_to_capacity() {
        let mut store = PatternStore::new();
        let mut frames = numbered(75);
        assert_eq!(store.upload(&mut frames), MAX_FRAMES);
        assert_eq!(store.len(), MAX_FRAMES);
        assert_eq!(store.frame_at(MAX_FRAMES - 1), &[59; 12]);
        // Frames past capacity are not pulled from the source
        assert_eq!(frames.next(), Some([60; 12]));
    }

    #[test]
    fn test_shorter_upload_hides_old_frames() {
        let mut store = PatternStore::new();
        store.upload(numbered(10));
        store.upload([[7; 12]; 2]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.frames(), &[[7; 12], [7; 12]]);
    }

    #[test]
    fn test_next_index_wraps() {
        let mut store = PatternStore::new();
        store.upload(numbered(3));
        assert_eq!(store.next_index(0), 1);
        assert_eq!(store.next_index(1), 2);
        assert_eq!(store.next_index(2), 0);

        store.upload(numbered(1));
        assert_eq!(store.next_index(0), 0);
    }
}
