//! Runtime dispatch
//!
//! Jalur dinamis untuk stream yang bentuknya baru diketahui saat runtime:
//! - Write: `Value` diklasifikasi lalu diarahkan ke codec yang cocok
//! - Read: `Descriptor` dari pemanggil menentukan codec; stream sendiri tidak menyimpan tipe
//!
//! Kind primitive tertutup (enum variant), tipe user terbuka lewat trait `Object`.

use std::any::{Any, TypeId};
use std::fmt;

use tracing::trace;

use super::handler::ImgHandler;
use super::serialize::{Decode, Encode};
use crate::error::{Error, IntKind, Result};

/// Object user yang bisa dibawa di dalam `Value`.
///
/// Di-implement otomatis untuk setiap tipe `Encode + Decode + Debug + Clone + PartialEq`.
pub trait Object: Encode + fmt::Debug + Any {
    fn object_type(&self) -> ObjectType;

    fn as_any(&self) -> &dyn Any;

    fn clone_object(&self) -> Box<dyn Object>;

    fn eq_object(&self, other: &dyn Object) -> bool;
}

impl<T> Object for T
where
    T: Encode + Decode + fmt::Debug + Clone + PartialEq + Any,
{
    fn object_type(&self) -> ObjectType {
        ObjectType::of::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_object(&self) -> Box<dyn Object> {
        Box::new(self.clone())
    }

    fn eq_object(&self, other: &dyn Object) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }
}

/// Referensi type-level ke tipe object: nama, `TypeId`, dan constructor decode-nya
#[derive(Clone, Copy)]
pub struct ObjectType {
    name: &'static str,
    type_id: TypeId,
    decode: fn(&mut ImgHandler<'_>) -> Result<Box<dyn Object>>,
}

impl ObjectType {
    pub fn of<T: Object + Decode>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
            decode: decode_boxed::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Jalankan `img_deserialize` milik tipe ini
    pub fn decode(&self, handler: &mut ImgHandler<'_>) -> Result<Box<dyn Object>> {
        (self.decode)(handler)
    }
}

fn decode_boxed<T: Object + Decode>(handler: &mut ImgHandler<'_>) -> Result<Box<dyn Object>> {
    Ok(Box::new(T::img_deserialize(handler)?))
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ObjectType").field(&self.name).finish()
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ObjectType {}

/// Bentuk value berikutnya di stream, disuplai oleh pembaca
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    Byte,
    I32,
    I64,
    Str,
    List(Box<Descriptor>),
    Object(ObjectType),
}

impl Descriptor {
    pub fn list(element: Descriptor) -> Self {
        Self::List(Box::new(element))
    }

    pub fn object<T: Object + Decode>() -> Self {
        Self::Object(ObjectType::of::<T>())
    }

    /// Descriptor untuk integer dengan lebar `kind`
    pub fn int(kind: IntKind) -> Self {
        match kind {
            IntKind::Byte => Self::Byte,
            IntKind::I32 => Self::I32,
            IntKind::I64 => Self::I64,
        }
    }

    pub fn int_kind(&self) -> Option<IntKind> {
        match self {
            Self::Byte => Some(IntKind::Byte),
            Self::I32 => Some(IntKind::I32),
            Self::I64 => Some(IntKind::I64),
            _ => None,
        }
    }

    /// Tebak descriptor dari value runtime.
    ///
    /// `Value::Int` memakai `default_int`. Elemen list ditebak dari elemen pertama
    /// yang bentuknya diketahui: sub-list kosong dilewati, jadi `[[], ["a"]]`
    /// menjadi `list[list[string]]`. List yang isinya kosong semua memakai
    /// `default_int` karena hanya count yang ditulis.
    pub fn infer(value: &Value, default_int: IntKind) -> Self {
        Self::known(value, default_int).unwrap_or_else(|| match value {
            Value::List(items) => Self::list(
                items
                    .first()
                    .map(|first| Self::infer(first, default_int))
                    .unwrap_or(Self::int(default_int)),
            ),
            _ => Self::int(default_int),
        })
    }

    /// `None` jika bentuk value tidak bisa dipastikan (list tanpa elemen konkret)
    fn known(value: &Value, default_int: IntKind) -> Option<Self> {
        Some(match value {
            Value::Int(_) => Self::int(default_int),
            Value::Byte(_) => Self::Byte,
            Value::I32(_) => Self::I32,
            Value::I64(_) => Self::I64,
            Value::Str(_) => Self::Str,
            Value::List(items) => {
                Self::list(items.iter().find_map(|item| Self::known(item, default_int))?)
            }
            Value::Object(obj) => Self::Object(obj.object_type()),
        })
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => f.write_str("byte"),
            Self::I32 => f.write_str("i32"),
            Self::I64 => f.write_str("i64"),
            Self::Str => f.write_str("string"),
            Self::List(element) => write!(f, "list[{}]", element),
            Self::Object(ty) => write!(f, "object {}", ty.name()),
        }
    }
}

/// Value runtime untuk jalur dispatch dinamis
#[derive(Debug)]
pub enum Value {
    /// Integer tanpa lebar eksplisit; ditulis dengan lebar default handler
    Int(i128),
    Byte(u8),
    I32(i32),
    I64(i64),
    Str(String),
    List(Vec<Value>),
    Object(Box<dyn Object>),
}

impl Value {
    pub fn object<T: Object>(value: T) -> Self {
        Self::Object(Box::new(value))
    }

    /// Nilai integer dari variant integer mana pun
    pub fn as_int(&self) -> Option<i128> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Byte(n) => Some(i128::from(*n)),
            Self::I32(n) => Some(i128::from(*n)),
            Self::I64(n) => Some(i128::from(*n)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Downcast object ke tipe konkretnya
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Object(obj) => (**obj).as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Nama kind untuk pesan error
    pub fn kind_name(&self) -> String {
        match self {
            Self::Int(_) => "integer".to_string(),
            Self::Byte(_) => "byte".to_string(),
            Self::I32(_) => "i32".to_string(),
            Self::I64(_) => "i64".to_string(),
            Self::Str(_) => "string".to_string(),
            Self::List(_) => "list".to_string(),
            Self::Object(obj) => format!("object {}", obj.object_type().name()),
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Self::Int(n) => Self::Int(*n),
            Self::Byte(n) => Self::Byte(*n),
            Self::I32(n) => Self::I32(*n),
            Self::I64(n) => Self::I64(*n),
            Self::Str(s) => Self::Str(s.clone()),
            Self::List(items) => Self::List(items.clone()),
            Self::Object(obj) => Self::Object(obj.clone_object()),
        }
    }
}

/// Kesetaraan per variant: `Int(1) != I64(1)`. Pakai `as_int` untuk membandingkan nilai.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a.eq_object(&**b),
            _ => false,
        }
    }
}

impl From<u8> for Value {
    fn from(v: u8) -> Self {
        Self::Byte(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::I32(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::I64(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

impl Encode for Value {
    fn img_serialize(&self, handler: &mut ImgHandler<'_>) -> Result<()> {
        handler.write_value(self)?;
        Ok(())
    }
}

fn unsupported(value: &Value, descriptor: &Descriptor) -> Error {
    Error::UnsupportedType {
        value: value.kind_name(),
        descriptor: descriptor.to_string(),
    }
}

impl ImgHandler<'_> {
    /// Klasifikasi value runtime lalu tulis dengan codec yang cocok.
    ///
    /// `Value::Int` memakai lebar default handler (i64 kecuali dikonfigurasi lain).
    /// List ditulis dengan descriptor hasil `Descriptor::infer`.
    pub fn write_value(&mut self, value: &Value) -> Result<&mut Self> {
        match value {
            Value::Int(n) => self.write_int(*n),
            Value::Byte(n) => self.write_byte(*n),
            Value::I32(n) => self.write_i32(*n),
            Value::I64(n) => self.write_i64(*n),
            Value::Str(s) => self.write_string(s),
            Value::List(_) => {
                let descriptor = Descriptor::infer(value, self.config().default_int_width);
                self.write_as(value, &descriptor)
            }
            Value::Object(obj) => self.write_object(&**obj),
        }
    }

    /// Tulis list dengan descriptor elemen eksplisit
    pub fn write_list_as(&mut self, items: &[Value], element: &Descriptor) -> Result<&mut Self> {
        trace!(element = %element, count = items.len(), offset = self.offset(), "write list");
        self.write_len(items.len())?;
        for item in items {
            self.write_as(item, element)?;
        }
        Ok(self)
    }

    /// Tulis `value` dengan bentuk `descriptor`.
    ///
    /// Integer dipersempit dengan cek range; bentuk yang tidak cocok gagal dengan
    /// `UnsupportedType`, termasuk object yang tipe konkretnya berbeda.
    pub fn write_as(&mut self, value: &Value, descriptor: &Descriptor) -> Result<&mut Self> {
        match descriptor {
            Descriptor::Byte | Descriptor::I32 | Descriptor::I64 => {
                let (Some(kind), Some(n)) = (descriptor.int_kind(), value.as_int()) else {
                    return Err(unsupported(value, descriptor));
                };
                self.write_int_as(kind, n)
            }
            Descriptor::Str => match value {
                Value::Str(s) => self.write_string(s),
                _ => Err(unsupported(value, descriptor)),
            },
            Descriptor::List(element) => match value {
                Value::List(items) => self.write_list_as(items, element),
                _ => Err(unsupported(value, descriptor)),
            },
            Descriptor::Object(ty) => match value {
                Value::Object(obj) if (**obj).as_any().type_id() == ty.type_id() => {
                    self.write_object(&**obj)
                }
                _ => Err(unsupported(value, descriptor)),
            },
        }
    }

    /// Baca value berikutnya sesuai descriptor dari pemanggil
    pub fn read_value(&mut self, descriptor: &Descriptor) -> Result<Value> {
        Ok(match descriptor {
            Descriptor::Byte => Value::Byte(self.read_byte()?),
            Descriptor::I32 => Value::I32(self.read_i32()?),
            Descriptor::I64 => Value::I64(self.read_i64()?),
            Descriptor::Str => Value::Str(self.read_string()?),
            Descriptor::List(element) => {
                let len = self.read_len()?;
                let mut items = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    items.push(self.read_value(element)?);
                }
                Value::List(items)
            }
            Descriptor::Object(ty) => Value::Object(ty.decode(self)?),
        })
    }
}
