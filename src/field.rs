use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use diesel::deserialize::{self, FromSql, Queryable};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::BigInt;
use log::trace;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Codec, Config, Error};

thread_local! {
    static CODEC_CACHE: RefCell<HashMap<TypeId, Arc<Codec>>> = RefCell::new(HashMap::new());
}

fn get_or_create_codec<T: TypeMarker>() -> Arc<Codec> {
    CODEC_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(codec) = cache.get(&TypeId::of::<T>()) {
            codec.clone()
        } else {
            let mut config = Config::global().unwrap_or_default();
            if let Some(key) = T::secure_key() {
                config = config.secure_key(key);
            }
            trace!("caching codec for {}", T::name());
            let codec = Arc::new(Codec::new(&config));
            cache.insert(TypeId::of::<T>(), codec.clone());
            codec
        }
    })
}

/// Names a family of IDs, and optionally gives it its own secure key.
///
/// Codecs are cached per marker type, so two markers with the same name still get their own
/// keys.
pub trait TypeMarker: std::fmt::Debug + 'static {
    fn name() -> &'static str;

    /// The secure key for this type.  `None` uses the key from the global configuration.
    fn secure_key() -> Option<&'static str> {
        None
    }
}

/// An generic type-safe object ID field (a wrapped i64).
///
/// When serialized with Serde, the number is automatically encoded into a short base62
/// string using the global configuration, or the marker's own secure key if it has one.
/// Deserialization decodes the string back to an integer.  The display transform is never
/// applied, so serialized values always decode.
///
/// Traits are also provided for Diesel compatibility with Postgres BigInt fields.
///
/// # Examples
///
/// ```
/// use yid;
/// use serde::{Serialize, Deserialize};
/// use serde_json;
///
/// #[derive(Clone, Copy, Debug)]
/// pub struct ExampleIdMarker;
/// impl yid::TypeMarker for ExampleIdMarker {
///     fn name() -> &'static str { "example" }
/// }
///
/// type ExampleId = yid::Field<ExampleIdMarker>;
///
/// #[derive(serde::Serialize)]
/// struct Example {
///     pub id: ExampleId,
/// }
///
/// yid::Config::set_global(yid::Config::new().secure_key("your-secret-key").pad_up(4));
/// let obj = Example {id: ExampleId::from(12345)};
/// let obj_str = serde_json::to_string(&obj).unwrap();
/// assert_eq!(obj_str, "{\"id\":\"HX25\"}");
/// ```
#[derive(AsExpression, Debug, Clone, Copy)]
#[diesel(sql_type = BigInt)]
pub struct Field<T: TypeMarker> {
    id: i64,
    _marker: std::marker::PhantomData<T>,
}

impl<T: TypeMarker> From<Field<T>> for i64 {
    /// Returns the raw `i64` value.
    fn from(field: Field<T>) -> Self {
        field.id
    }
}

impl<T: TypeMarker> PartialEq for Field<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: TypeMarker> Eq for Field<T> {}

impl<T: TypeMarker> fmt::Display for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Field {{ id: {}, marker: {} }}", self.id, T::name())
    }
}

impl<T: TypeMarker> Field<T> {
    /// Creates a `Field<T>` value from an `i64`.
    ///
    /// This method converts an `i64` into a `Field<T>`, effectively changing its type.
    pub fn from(id: i64) -> Self {
        Field {
            id,
            _marker: std::marker::PhantomData,
        }
    }

    /// Encodes the ID with the marker's codec, without any display transform.
    pub fn encode_raw(&self) -> Result<String, Error> {
        get_or_create_codec::<T>().encode_raw(self.id)
    }

    /// Decodes a string produced by [`Field::encode_raw`].
    pub fn decode(encoded: &str) -> Result<Self, Error> {
        let id = get_or_create_codec::<T>().decode(encoded)?;
        Ok(Field::from(id))
    }
}

impl<T: TypeMarker> Serialize for Field<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded = self.encode_raw().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&encoded)
    }
}

impl<'de, T: TypeMarker> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        Field::decode(&encoded).map_err(serde::de::Error::custom)
    }
}

impl<T: TypeMarker> ToSql<BigInt, Pg> for Field<T> {
    fn to_sql(&self, out: &mut Output<'_, '_, Pg>) -> serialize::Result {
        <i64 as ToSql<BigInt, Pg>>::to_sql(&self.id, &mut out.reborrow())
    }
}

impl<T: TypeMarker> FromSql<BigInt, Pg> for Field<T> {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        let id = <i64 as FromSql<BigInt, Pg>>::from_sql(bytes)?;
        Ok(Field::from(id))
    }
}

impl<T> Queryable<BigInt, Pg> for Field<T>
where
    T: TypeMarker,
{
    type Row = <i64 as Queryable<BigInt, Pg>>::Row;

    fn build(row: Self::Row) -> deserialize::Result<Self> {
        let id = i64::build(row)?;
        Ok(Field::from(id))
    }
}
