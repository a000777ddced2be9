use crate::{
    allocator::TensorAllocator,
    array::{Array, ArrayBase},
    data::Data,
    policy::IndexPolicy,
    tiny::{TinyMatrix, TinyVector},
};

use serde::ser::SerializeStruct;
use serde::Deserialize;

impl<S, P> serde::Serialize for ArrayBase<S, P>
where
    S: Data,
    S::Elem: serde::Serialize,
    P: IndexPolicy,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        // views may be strided, so the data goes out in logical order
        let data: Vec<&S::Elem> = self.iter().collect();
        let mut state = serializer.serialize_struct("Array", 2)?;
        state.serialize_field("shape", self.shape())?;
        state.serialize_field("data", &data)?;
        state.end()
    }
}

impl<'de, T, P, A> serde::Deserialize<'de> for Array<T, P, A>
where
    T: serde::Deserialize<'de>,
    P: IndexPolicy,
    A: TensorAllocator + Default + 'static,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct ArrayData<T> {
            shape: Vec<usize>,
            data: Vec<T>,
        }

        let ArrayData { shape, data } = ArrayData::deserialize(deserializer)?;
        Array::from_shape_vec(&shape, data, A::default()).map_err(serde::de::Error::custom)
    }
}

impl<T, const N: usize, P> serde::Serialize for TinyVector<T, N, P>
where
    T: serde::Serialize,
    P: IndexPolicy,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serde::Serialize::serialize(self.as_slice(), serializer)
    }
}

impl<'de, T, const N: usize, P> serde::Deserialize<'de> for TinyVector<T, N, P>
where
    T: serde::Deserialize<'de> + Clone,
    P: IndexPolicy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Vec::<T>::deserialize(deserializer)?;
        Self::from_slice(&data).map_err(serde::de::Error::custom)
    }
}

impl<T, const M: usize, const N: usize, P> serde::Serialize for TinyMatrix<T, M, N, P>
where
    T: serde::Serialize,
    P: IndexPolicy,
{
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        serde::Serialize::serialize(self.as_slice(), serializer)
    }
}

impl<'de, T, const M: usize, const N: usize, P> serde::Deserialize<'de> for TinyMatrix<T, M, N, P>
where
    T: serde::Deserialize<'de> + Clone,
    P: IndexPolicy,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = Vec::<T>::deserialize(deserializer)?;
        Self::from_slice(&data).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{allocator::CpuAllocator, policy::Periodic, view::ArrayView};

    #[test]
    fn test_serde_array() -> Result<(), Box<dyn std::error::Error>> {
        let array = Array::<u8>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], CpuAllocator)?;
        let serialized = serde_json::to_string(&array)?;
        assert_eq!(serialized, r#"{"shape":[2,3],"data":[1,2,3,4,5,6]}"#);
        let deserialized: Array<u8> = serde_json::from_str(&serialized)?;
        assert_eq!(array, deserialized);

        let periodic: Array<u8, Periodic> = serde_json::from_str(&serialized)?;
        assert_eq!(periodic[[-1, -1]], 6);
        Ok(())
    }

    #[test]
    fn test_serde_strided_view() -> Result<(), Box<dyn std::error::Error>> {
        let buffer = [1, 2, 3, 4];
        let view = ArrayView::<i32>::from_shape_strides(&[2, 2], &[1, 2], &buffer)?;
        let serialized = serde_json::to_string(&view)?;
        assert_eq!(serialized, r#"{"shape":[2,2],"data":[1,3,2,4]}"#);
        Ok(())
    }

    #[test]
    fn test_serde_rejects_bad_length() {
        let result: Result<Array<u8>, _> = serde_json::from_str(r#"{"shape":[2,2],"data":[1,2,3]}"#);
        assert!(result.is_err());
        let result: Result<TinyVector<f64, 3>, _> = serde_json::from_str("[1.0, 2.0]");
        assert!(result.is_err());
    }

    #[test]
    fn test_serde_tiny() -> Result<(), Box<dyn std::error::Error>> {
        let m = TinyMatrix::<f64, 2, 2>::identity();
        let serialized = serde_json::to_string(&m)?;
        assert_eq!(serialized, "[1.0,0.0,0.0,1.0]");
        let back: TinyMatrix<f64, 2, 2> = serde_json::from_str(&serialized)?;
        assert_eq!(back, m);
        Ok(())
    }
}
