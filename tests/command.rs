mod tests {
    use std::collections::VecDeque;

    use pwm_strip_controller::command::{
        MAX_UPLOAD_LEN, encode_speed, encode_start, encode_static, encode_stop, encode_upload,
        sanitize_payload,
    };
    use pwm_strip_controller::frame::Frame;
    use pwm_strip_controller::{
        Command, Controller, ControllerConfig, MAX_FRAMES, Opcode, PlaybackState, SerialPort,
        SharedDuty, Speed,
    };

    /// Serial port fed from a fixed script of bytes
    #[derive(Default)]
    struct ScriptedSerial {
        bytes: VecDeque<u8>,
    }

    impl ScriptedSerial {
        fn feed(&mut self, bytes: &[u8]) {
            self.bytes.extend(bytes);
        }
    }

    impl SerialPort for ScriptedSerial {
        fn byte_available(&mut self) -> bool {
            !self.bytes.is_empty()
        }

        fn read_byte(&mut self) -> u8 {
            self.bytes
                .pop_front()
                .expect("command waited for bytes that were never sent")
        }
    }

    fn controller(duty: &SharedDuty) -> Controller<'_, ScriptedSerial> {
        Controller::new(ScriptedSerial::default(), duty, &ControllerConfig::default())
    }

    fn upload_bytes(frames: &[Frame]) -> Vec<u8> {
        let mut bytes = vec![0xFE, frames.len() as u8];
        for frame in frames {
            bytes.extend_from_slice(frame);
        }
        bytes
    }

    const RAMP: Frame = [0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110];

    #[test]
    fn test_opcode_from_raw() {
        assert_eq!(Opcode::from_raw(0xFF), Some(Opcode::SetStatic));
        assert_eq!(Opcode::from_raw(0xFE), Some(Opcode::Upload));
        assert_eq!(Opcode::from_raw(0xFD), Some(Opcode::SetSpeed));
        assert_eq!(Opcode::from_raw(0xFC), Some(Opcode::Start));
        assert_eq!(Opcode::from_raw(0xFB), Some(Opcode::Stop));
        assert_eq!(Opcode::from_raw(0xFA), None);
        assert_eq!(Opcode::from_raw(0x00), None);
        assert_eq!(Opcode::Upload.as_raw(), 0xFE);
    }

    #[test]
    fn test_boot_state() {
        let duty = SharedDuty::new();
        duty.store([1; 12]);
        let mut controller = controller(&duty);

        assert_eq!(duty.load(), [0; 12]);
        assert!(controller.pattern().is_empty());
        assert_eq!(controller.playback().state(), PlaybackState::Stopped);
        assert_eq!(controller.poll(), None);
    }

    #[test]
    fn test_static_color() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&[0xFF]);
        controller.serial_mut().feed(&RAMP);

        assert_eq!(controller.poll(), Some(Command::SetStatic(RAMP)));
        assert_eq!(duty.load(), RAMP);
        assert_eq!(controller.poll(), None);
    }

    #[test]
    fn test_static_color_is_idempotent() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&encode_static(&RAMP));
        controller.poll();
        let once = duty.load();

        controller.serial_mut().feed(&encode_static(&RAMP));
        controller.poll();
        assert_eq!(duty.load(), once);
    }

    #[test]
    fn test_static_color_stops_playback() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller
            .serial_mut()
            .feed(&upload_bytes(&[[0; 12], [200; 12]]));
        controller.poll();
        assert!(controller.playback().is_playing());

        controller.serial_mut().feed(&encode_static(&[42; 12]));
        controller.poll();
        assert_eq!(controller.playback().state(), PlaybackState::Stopped);

        for _ in 0..2000 {
            controller.poll();
        }
        assert_eq!(duty.load(), [42; 12]);
    }

    #[test]
    fn test_upload_starts_playback_on_first_frame() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller
            .serial_mut()
            .feed(&upload_bytes(&[RAMP, [5; 12], [6; 12]]));

        assert_eq!(
            controller.poll(),
            Some(Command::Upload {
                frames: 3,
                declared: 3
            })
        );
        assert_eq!(controller.pattern().len(), 3);
        assert_eq!(controller.pattern().frame_at(1), &[5; 12]);
        assert!(controller.playback().is_playing());
        assert_eq!(duty.load(), RAMP);
    }

    #[test]
    fn test_stop_then_start_reproduces_first_frame() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller
            .serial_mut()
            .feed(&upload_bytes(&[RAMP, [255; 12]]));
        controller.poll();

        // Let playback move away from frame 0
        for _ in 0..5000 {
            controller.poll();
        }
        assert_ne!(duty.load(), RAMP);

        controller.serial_mut().feed(&encode_stop());
        assert_eq!(controller.poll(), Some(Command::Stop));
        controller.serial_mut().feed(&encode_start());
        assert_eq!(controller.poll(), Some(Command::Start { started: true }));

        assert_eq!(duty.load(), RAMP);
        assert_eq!(controller.playback().cursor().current_frame, 0);
        assert_eq!(controller.playback().cursor().interp_progress, 0);
    }

    #[test]
    fn test_oversized_upload_is_clamped_and_drained() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);

        let frames: Vec<Frame> = (0..70).map(|i| [i as u8; 12]).collect();
        controller.serial_mut().feed(&upload_bytes(&frames));
        controller.serial_mut().feed(&encode_stop());

        assert_eq!(
            controller.poll(),
            Some(Command::Upload {
                frames: 60,
                declared: 70
            })
        );
        assert_eq!(controller.pattern().len(), MAX_FRAMES);
        assert_eq!(controller.pattern().frame_at(59), &[59; 12]);

        // The excess payload is gone, the next byte is the stop opcode
        assert_eq!(controller.poll(), Some(Command::Stop));
        assert_eq!(controller.poll(), None);
    }

    #[test]
    fn test_empty_upload_stays_stopped() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&upload_bytes(&[RAMP]));
        controller.poll();

        controller.serial_mut().feed(&[0xFE, 0]);
        assert_eq!(
            controller.poll(),
            Some(Command::Upload {
                frames: 0,
                declared: 0
            })
        );
        assert!(controller.pattern().is_empty());
        assert_eq!(controller.playback().state(), PlaybackState::Stopped);
        assert_eq!(duty.load(), RAMP);
    }

    #[test]
    fn test_start_without_pattern_is_noop() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&encode_start());

        assert_eq!(controller.poll(), Some(Command::Start { started: false }));
        assert_eq!(controller.playback().state(), PlaybackState::Stopped);
        assert_eq!(duty.load(), [0; 12]);
    }

    #[test]
    fn test_speed_is_clamped() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);

        controller.serial_mut().feed(&[0xFD, 0]);
        assert_eq!(controller.poll(), Some(Command::SetSpeed(Speed::new(1))));
        assert_eq!(controller.playback().speed().get(), 1);

        controller.serial_mut().feed(&[0xFD, 255]);
        assert_eq!(controller.poll(), Some(Command::SetSpeed(Speed::new(10))));
        assert_eq!(controller.playback().speed().get(), 10);

        controller.serial_mut().feed(&encode_speed(3));
        controller.poll();
        assert_eq!(controller.playback().speed().get(), 3);
    }

    #[test]
    fn test_speed_does_not_change_playback_state() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&encode_speed(8));
        controller.poll();
        assert_eq!(controller.playback().state(), PlaybackState::Stopped);

        controller.serial_mut().feed(&upload_bytes(&[RAMP]));
        controller.poll();
        controller.serial_mut().feed(&encode_speed(2));
        controller.poll();
        assert!(controller.playback().is_playing());
    }

    #[test]
    fn test_unknown_bytes_are_dropped() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&[0x00, 0x42, 0xFA]);

        assert_eq!(controller.poll(), Some(Command::Ignored(0x00)));
        assert_eq!(controller.poll(), Some(Command::Ignored(0x42)));
        assert_eq!(controller.poll(), Some(Command::Ignored(0xFA)));
        assert_eq!(controller.poll(), None);
        assert_eq!(duty.load(), [0; 12]);
    }

    #[test]
    fn test_playback_runs_in_loop_iterations() {
        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&encode_speed(10));
        controller.poll();
        controller
            .serial_mut()
            .feed(&upload_bytes(&[[0; 12], [255; 12]]));
        controller.poll();

        // Speed 10 with the default scale steps every 60 iterations
        for _ in 0..59 {
            controller.poll();
        }
        assert_eq!(duty.load(), [0; 12]);
        controller.poll();
        assert_eq!(duty.load(), [15; 12]);
    }

    #[test]
    fn test_sanitize_payload() {
        assert_eq!(sanitize_payload(0xFF), 0xFE);
        assert_eq!(sanitize_payload(0xFE), 0xFE);
        assert_eq!(sanitize_payload(0x00), 0x00);
    }

    #[test]
    fn test_encoded_upload_is_executed() {
        let frames = [[255; 12], RAMP];
        let message = encode_upload(&frames);
        assert_eq!(message.len(), 2 + 2 * 12);
        assert_eq!(&message[..2], &[0xFE, 2]);

        let duty = SharedDuty::new();
        let mut controller = controller(&duty);
        controller.serial_mut().feed(&message);
        controller.poll();
        assert_eq!(controller.pattern().frames(), &[[0xFE; 12], RAMP]);
    }

    #[test]
    fn test_encode_upload_truncates() {
        let frames = [[1; 12]; 61];
        let message = encode_upload(&frames);
        assert_eq!(message.len(), MAX_UPLOAD_LEN);
        assert_eq!(message[1], 60);
    }
}
