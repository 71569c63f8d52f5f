//! End-to-End Stream Test
//!
//! Tulis stream campuran ke raster, simpan ke disk, buka handler baru di atas
//! raster hasil load, lalu baca ulang dengan urutan yang sama.
//!
//! Usage:
//!   cargo test --test end_to_end

use image::RgbImage;
use proptest::prelude::*;

use pixelcodec::core::load_png;
use pixelcodec::{
    Decode, Descriptor, Encode, Error, ImgHandler, IntKind, MmapSurface, Result, Surface, Value,
};

#[derive(Debug, Clone, PartialEq)]
struct Player {
    x: i32,
    y: i32,
    health: i32,
    name: String,
}

impl Player {
    fn new(name: &str, x: i32, y: i32, health: i32) -> Self {
        Self {
            x,
            y,
            health,
            name: name.to_string(),
        }
    }
}

impl Encode for Player {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler
            .write_i32(self.x)?
            .write_i32(self.y)?
            .write_i32(self.health)?
            .write_string(&self.name)?;
        Ok(())
    }
}

impl Decode for Player {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        Ok(Self {
            x: handler.read_i32()?,
            y: handler.read_i32()?,
            health: handler.read_i32()?,
            name: handler.read_string()?,
        })
    }
}

/// Data skenario lengkap
struct Scenario {
    motto: String,
    simple: Player,
    default: Player,
    small: Vec<i64>,
    players: Vec<Player>,
    big: Vec<i64>,
}

impl Scenario {
    fn new() -> Self {
        let simple = Player::new("Mega man", 600, 784, 48);
        let default = Player::new("Jonny Razer", 0, 0, 100);

        // LCG deterministik, mencakup nilai negatif dan ekstrem
        let mut state = 42u64;
        let mut big: Vec<i64> = (0..498)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                state as i64
            })
            .collect();
        big.push(i64::MIN);
        big.push(i64::MAX);

        Self {
            motto: "My Very Eager Mother Just Made Us Nachos".to_string(),
            players: vec![default.clone(), simple.clone()],
            simple,
            default,
            small: vec![0, 255, 512, 1024, 2048, -1],
            big,
        }
    }

    /// Total byte sesuai wire format
    fn encoded_len(&self) -> usize {
        let string = |s: &str| 4 + s.len();
        let player = |p: &Player| 12 + string(&p.name);
        string("Gaming Town")
            + 8
            + string(&self.motto)
            + 4
            + player(&self.simple)
            + player(&self.default)
            + 4
            + 8 * self.small.len()
            + 4
            + self.players.iter().map(player).sum::<usize>()
            + 4
            + 8 * self.big.len()
    }

    fn write(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler
            .write_string("Gaming Town")?
            .write_i64(22)?
            .write_string(&self.motto)?
            .write_i32(9925)?
            .write_object(&self.simple)?
            .write_object(&self.default)?
            .write_list(&self.small)?
            .write_list(&self.players)?
            .write_list(&self.big)?;
        Ok(())
    }

    fn verify(&self, reader: &mut ImgHandler<'_>) {
        assert_eq!(reader.read_string().unwrap(), "Gaming Town");
        assert_eq!(reader.read_i64().unwrap(), 22);
        assert_eq!(reader.read_string().unwrap(), self.motto);
        assert_eq!(reader.read_i32().unwrap(), 9925);
        assert_eq!(reader.read_object::<Player>().unwrap(), self.simple);
        assert_eq!(reader.read_object::<Player>().unwrap(), self.default);
        assert_eq!(reader.read_list::<i64>().unwrap(), self.small);
        assert_eq!(reader.read_list::<Player>().unwrap(), self.players);
        assert_eq!(reader.read_next::<Vec<i64>>().unwrap(), self.big);
    }
}

#[test]
fn test_scenario_png_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.png");
    let scenario = Scenario::new();

    let mut img = RgbImage::new(50, 50);
    let mut handler = ImgHandler::new(&mut img);
    scenario.write(&mut handler).unwrap();
    assert_eq!(handler.offset(), scenario.encoded_len());
    handler.save_file(&path).unwrap();

    let mut loaded = load_png(&path).unwrap();
    let mut reader = ImgHandler::new(&mut loaded);
    scenario.verify(&mut reader);
    assert_eq!(reader.offset(), scenario.encoded_len());
}

#[test]
fn test_scenario_ppm_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scenario.ppm");
    let scenario = Scenario::new();

    {
        let mut surface = MmapSurface::create(&path, 50, 50).unwrap();
        let mut handler = ImgHandler::new(&mut surface);
        scenario.write(&mut handler).unwrap();
        handler.save_file(&path).unwrap();
    }

    let mut surface = MmapSurface::open(&path).unwrap();
    let mut reader = ImgHandler::new(&mut surface);
    scenario.verify(&mut reader);
    assert_eq!(reader.offset(), scenario.encoded_len());
}

#[test]
fn test_scenario_through_values() {
    let scenario = Scenario::new();
    let stream = vec![
        Value::from("Gaming Town"),
        Value::Int(22),
        Value::from(scenario.motto.as_str()),
        Value::I32(9925),
        Value::object(scenario.simple.clone()),
        Value::object(scenario.default.clone()),
        Value::from(scenario.small.clone()),
        Value::List(scenario.players.iter().cloned().map(Value::object).collect()),
        Value::from(scenario.big.clone()),
    ];

    let mut img = RgbImage::new(50, 50);
    let mut handler = ImgHandler::new(&mut img);
    for value in &stream {
        handler.write_value(value).unwrap();
    }
    assert_eq!(handler.offset(), scenario.encoded_len());

    // Wire format identik dengan jalur statis
    let mut reader = ImgHandler::new(&mut img);
    scenario.verify(&mut reader);

    let player = Descriptor::object::<Player>();
    let mut reader = ImgHandler::new(&mut img);
    assert_eq!(reader.read_value(&Descriptor::Str).unwrap(), stream[0]);
    assert_eq!(reader.read_value(&Descriptor::I64).unwrap(), Value::I64(22));
    assert_eq!(reader.read_value(&Descriptor::Str).unwrap(), stream[2]);
    assert_eq!(reader.read_value(&Descriptor::I32).unwrap(), stream[3]);
    assert_eq!(reader.read_value(&player).unwrap(), stream[4]);
    assert_eq!(reader.read_value(&player).unwrap(), stream[5]);
    assert_eq!(
        reader.read_value(&Descriptor::list(Descriptor::I64)).unwrap(),
        stream[6]
    );
    assert_eq!(
        reader.read_value(&Descriptor::list(player.clone())).unwrap(),
        stream[7]
    );
    assert_eq!(
        reader.read_value(&Descriptor::list(Descriptor::I64)).unwrap(),
        stream[8]
    );
}

#[test]
fn test_capacity_boundary_exact_fill() {
    // 4x2 pixel = 24 byte = 3 x i64
    let mut img = RgbImage::new(4, 2);
    let capacity = Surface::capacity(&img);
    let mut handler = ImgHandler::new(&mut img);
    assert_eq!(handler.capacity(), capacity);

    for i in 0..3i64 {
        handler.write_i64(i).unwrap();
    }
    assert_eq!(handler.offset(), capacity);

    match handler.write_byte(0).err().unwrap() {
        Error::OutOfSpace {
            offset,
            requested,
            capacity: cap,
        } => {
            assert_eq!(offset, 24);
            assert_eq!(requested, 1);
            assert_eq!(cap, 24);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_read_past_end_is_out_of_space() {
    let mut img = RgbImage::new(1, 1);
    let mut reader = ImgHandler::new(&mut img);
    assert!(matches!(reader.read_i32(), Err(Error::OutOfSpace { .. })));
}

#[test]
fn test_literal_range_errors() {
    let mut img = RgbImage::new(4, 4);
    let mut handler = ImgHandler::new(&mut img);

    assert!(matches!(
        handler.write_i32(2_147_483_648u32).err(),
        Some(Error::Range { kind: IntKind::I32, .. })
    ));
    assert!(matches!(
        handler.write_i64(9_223_372_036_854_775_808u64).err(),
        Some(Error::Range { kind: IntKind::I64, .. })
    ));
    assert!(matches!(
        handler.write_value(&Value::Int(-9_223_372_036_854_775_809)).err(),
        Some(Error::Range { kind: IntKind::I64, .. })
    ));
}

proptest! {
    #[test]
    fn prop_i32_roundtrip(values in prop::collection::vec(any::<i32>(), 0..64)) {
        let mut img = RgbImage::new(16, 16);
        let mut handler = ImgHandler::new(&mut img);
        for v in &values {
            handler.write_i32(*v).unwrap();
        }
        prop_assert_eq!(handler.offset(), values.len() * 4);

        let mut reader = ImgHandler::new(&mut img);
        for v in &values {
            prop_assert_eq!(reader.read_i32().unwrap(), *v);
        }
    }

    #[test]
    fn prop_i64_roundtrip(values in prop::collection::vec(any::<i64>(), 0..64)) {
        let mut img = RgbImage::new(16, 16);
        let mut handler = ImgHandler::new(&mut img);
        handler.write_list(&values).unwrap();

        let mut reader = ImgHandler::new(&mut img);
        prop_assert_eq!(reader.read_list::<i64>().unwrap(), values);
    }

    #[test]
    fn prop_string_roundtrip(text in any::<String>()) {
        let mut img = RgbImage::new(64, 64);
        let mut handler = ImgHandler::new(&mut img);
        handler.write_string(&text).unwrap();
        // Prefix = panjang UTF-8, bukan jumlah karakter
        prop_assert_eq!(handler.offset(), 4 + text.len());

        let mut reader = ImgHandler::new(&mut img);
        prop_assert_eq!(reader.read_i32().unwrap() as usize, text.len());

        let mut reader = ImgHandler::new(&mut img);
        prop_assert_eq!(reader.read_string().unwrap(), text);
    }

    #[test]
    fn prop_out_of_range_i32_rejected(value in (i32::MAX as i64 + 1)..=i64::MAX) {
        let mut img = RgbImage::new(4, 4);
        let mut handler = ImgHandler::new(&mut img);
        let is_range = matches!(handler.write_i32(value).err(), Some(Error::Range { .. }));
        prop_assert!(is_range);
        prop_assert_eq!(handler.offset(), 0);
    }

    #[test]
    fn prop_cursor_advances_by_encoded_width(ops in prop::collection::vec(0u8..4, 1..40)) {
        let mut img = RgbImage::new(32, 32);
        let mut handler = ImgHandler::new(&mut img);
        let mut expected = 0usize;
        for op in ops {
            let before = handler.offset();
            match op {
                0 => { handler.write_byte(7).unwrap(); expected += 1; }
                1 => { handler.write_i32(-7).unwrap(); expected += 4; }
                2 => { handler.write_i64(7).unwrap(); expected += 8; }
                _ => { handler.write_string("é7").unwrap(); expected += 4 + 3; }
            }
            prop_assert!(handler.offset() > before);
            prop_assert_eq!(handler.offset(), expected);
        }
    }
}
