//! Player Inventory - Dynamic Dispatch Demo
//!
//! Menulis stream campuran lewat `Value` ke file PPM yang di-mmap,
//! lalu membacanya kembali dengan `Descriptor` yang disusun pembaca.
//!
//! Usage:
//!   cargo run --example player -- [path.ppm]

use pixelcodec::{Decode, Descriptor, Encode, ImgHandler, MmapSurface, Result, Value};

#[derive(Debug, Clone, PartialEq)]
struct Item {
    name: String,
    count: i32,
    slot: u8,
}

impl Encode for Item {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler
            .write_string(&self.name)?
            .write_i32(self.count)?
            .write_byte(self.slot)?;
        Ok(())
    }
}

impl Decode for Item {
    fn img_deserialize(handler: &mut ImgHandler<'_>) -> Result<Self> {
        Ok(Self {
            name: handler.read_string()?,
            count: handler.read_i32()?,
            slot: handler.read_byte()?,
        })
    }
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "inventory.ppm".to_string());

    let stream = vec![
        Value::from("Jonny Razer"),
        Value::I64(1_000_000),
        Value::List(vec![
            Value::object(Item {
                name: "potion".to_string(),
                count: 3,
                slot: 0,
            }),
            Value::object(Item {
                name: "rope".to_string(),
                count: 1,
                slot: 4,
            }),
        ]),
        Value::from(vec![vec![1i32, 2], vec![3]]),
    ];

    // Bentuk yang harus disuplai pembaca; tidak ada yang tersimpan di raster
    let schema = vec![
        Descriptor::Str,
        Descriptor::I64,
        Descriptor::list(Descriptor::object::<Item>()),
        Descriptor::list(Descriptor::list(Descriptor::I32)),
    ];

    let written = {
        let mut surface = MmapSurface::create(&path, 16, 16)?;
        let mut handler = ImgHandler::new(&mut surface);
        for value in &stream {
            handler.write_value(value)?;
        }
        handler.save_file(&path)?;
        handler.offset()
    };
    println!("wrote {} bytes to {}", written, path);

    let mut surface = MmapSurface::open(&path)?;
    let mut reader = ImgHandler::new(&mut surface);
    let mut decoded = Vec::with_capacity(schema.len());
    for (descriptor, expected) in schema.iter().zip(&stream) {
        let value = reader.read_value(descriptor)?;
        let status = if &value == expected { "ok" } else { "MISMATCH" };
        println!("{:<28} {:<8} {:?}", descriptor.to_string(), status, value);
        decoded.push(value);
    }

    for item in inventory(&decoded).unwrap_or_default() {
        println!("  - {} x{} (slot {})", item.name, item.count, item.slot);
    }

    Ok(())
}

fn inventory(stream: &[Value]) -> Option<Vec<&Item>> {
    stream
        .get(2)?
        .as_list()?
        .iter()
        .map(|value| value.downcast_ref::<Item>())
        .collect()
}
