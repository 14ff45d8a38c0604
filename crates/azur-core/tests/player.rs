use azur_core::demo::DemoPlayer;
use azur_core::player::{
    operation, status, HdmiResolution, OsdPosition, Player, RepeatMode, SubtitleShift,
    VerboseMode, ZoomRatio,
};
use azur_core::protocol::{Connection, ConnectionConfig, ProtocolError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn demo_player(demo: DemoPlayer) -> Player {
    init_tracing();
    let conn = Connection::with_transport(Box::new(demo), ConnectionConfig::new("demo")).unwrap();
    Player::new(conn)
}

#[test]
fn test_open_demo_port() {
    init_tracing();
    let mut player = Player::open(&ConnectionConfig::new("demo")).unwrap();
    assert_eq!(player.invoke("query_model_number", None).unwrap(), "BD751");
    assert_eq!(player.invoke("query_power_status", None).unwrap(), "1");
}

#[test]
fn test_settings_are_reflected_by_queries() {
    let mut player = demo_player(DemoPlayer::new());

    player.set_repeat(RepeatMode::Chapter).unwrap();
    let reply = player.invoke("query_repeat_mode", None).unwrap();
    assert_eq!(reply, "02");
    assert_eq!(status::describe("QRP", &reply), Some("Repeat chapter"));

    player.set_zoom_ratio(ZoomRatio::Underscan).unwrap();
    let reply = player.invoke("query_zoom_mode", None).unwrap();
    assert_eq!(status::zoom_status(&reply), Some("Underscan"));

    player.set_hdmi_resolution(HdmiResolution::P1080).unwrap();
    let reply = player.invoke("query_hdmi_resolution", None).unwrap();
    assert_eq!(status::hdmi_status(&reply), Some("1080 vertical lines (progressive)"));

    player.set_verbose_mode(VerboseMode::EchoCommands).unwrap();
    assert_eq!(player.invoke("query_verbose_mode", None).unwrap(), "1");

    player
        .set_subtitle_shift(SubtitleShift::new(-2).unwrap())
        .unwrap();
    assert_eq!(player.invoke("query_subtitle_shift", None).unwrap(), "-2");

    player.set_osd_position(OsdPosition::new(3).unwrap()).unwrap();
    assert_eq!(player.invoke("query_osd_position", None).unwrap(), "3");
}

#[test]
fn test_playback_flow() {
    let mut player = demo_player(DemoPlayer::new());

    assert_eq!(player.invoke("play", None).unwrap(), "PLAY");
    assert_eq!(player.invoke("query_playback_status", None).unwrap(), "PLAY");
    player.invoke("next", None).unwrap();
    assert_eq!(player.invoke("query_chapter", None).unwrap(), "02");
    assert_eq!(player.search("C10").unwrap(), "C10");
    assert_eq!(player.invoke("pause", None).unwrap(), "PAUSE");
    assert_eq!(player.invoke("stop", None).unwrap(), "STOP");
}

#[test]
fn test_device_errors_surface() {
    let mut player = demo_player(DemoPlayer::new().in_standby());

    match player.invoke("play", None) {
        Err(ProtocolError::DeviceError(detail)) => assert_eq!(detail, " STANDBY"),
        other => panic!("expected DeviceError, got {:?}", other),
    }
    // Unknown code reaches the device through raw dispatch
    assert!(matches!(
        player.connection_mut().dispatch("ZZZ", None),
        Err(ProtocolError::DeviceError(_))
    ));
}

#[test]
fn test_noisy_line_is_tolerated() {
    let mut player = demo_player(DemoPlayer::new().with_noise(1.0, 42));

    for _ in 0..20 {
        assert_eq!(player.invoke("query_model_number", None).unwrap(), "BD751");
    }
    assert_eq!(
        player.connection().timeout(),
        ConnectionConfig::default().timeout()
    );
}

#[test]
fn test_verbose_mode_out_of_range_is_rejected_locally() {
    let mut player = demo_player(DemoPlayer::new());

    assert!(matches!(
        VerboseMode::try_from(5),
        Err(ProtocolError::InvalidArgument(_))
    ));
    assert!(matches!(
        player.invoke("set_verbose_mode", Some("5")),
        Err(ProtocolError::InvalidArgument(_))
    ));
    // Nothing was sent
    assert_eq!(player.connection().get_counters(), (0, 0, 0, 0));
}

#[test]
fn test_unknown_operation_is_rejected_locally() {
    let mut player = demo_player(DemoPlayer::new());
    assert!(matches!(
        player.invoke("warp", None),
        Err(ProtocolError::UnknownOperation(_))
    ));
    assert!(operation("warp").is_none());
    assert_eq!(player.connection().get_counters(), (0, 0, 0, 0));
}
