use crate::{
    tensor2::Tensor2, tensor2d::Tensor2d, tensor2s::Tensor2s, tensor4::Tensor4, vector::Vector,
};

// Every cartesian tensor goes over the wire as its flat stored components:
// row-major for full tensors, the packed triangle or the diagonal otherwise.
macro_rules! impl_serde {
    ($name:ident $(, $bound:path)?) => {
        impl<T, const ND: usize> serde::Serialize for $name<T, ND>
        where
            T: serde::Serialize,
        {
            fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
            where
                Ser: serde::Serializer,
            {
                serde::Serialize::serialize(self.as_slice(), serializer)
            }
        }

        impl<'de, T, const ND: usize> serde::Deserialize<'de> for $name<T, ND>
        where
            T: serde::Deserialize<'de> + Clone $(+ $bound)?,
        {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let data = <Vec<T> as serde::Deserialize>::deserialize(deserializer)?;
                Self::from_list(&data).map_err(serde::de::Error::custom)
            }
        }
    };
}

impl_serde!(Vector);
impl_serde!(Tensor2);
impl_serde!(Tensor4);
impl_serde!(Tensor2s, num_traits::Zero);
impl_serde!(Tensor2d);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_vector() -> Result<(), Box<dyn std::error::Error>> {
        let v = Vector::<f64, 3>::from_array([1.0, 2.0, 3.0]);
        let serialized = serde_json::to_string(&v)?;
        assert_eq!(serialized, "[1.0,2.0,3.0]");
        let back: Vector<f64, 3> = serde_json::from_str(&serialized)?;
        assert_eq!(back, v);
        Ok(())
    }

    #[test]
    fn test_serde_tensor2() -> Result<(), Box<dyn std::error::Error>> {
        let t = Tensor2::<f64, 2>::from_array([[1.0, 2.0], [3.0, 4.0]]);
        let serialized = serde_json::to_string(&t)?;
        assert_eq!(serialized, "[1.0,2.0,3.0,4.0]");
        let back: Tensor2<f64, 2> = serde_json::from_str(&serialized)?;
        assert_eq!(back.det(), -2.0);
        Ok(())
    }

    #[test]
    fn test_serde_tensor4() -> Result<(), Box<dyn std::error::Error>> {
        let t = Tensor4::<f64, 2>::identity_sym();
        let back: Tensor4<f64, 2> = serde_json::from_str(&serde_json::to_string(&t)?)?;
        assert_eq!(back, t);
        Ok(())
    }

    #[test]
    fn test_serde_compressed() -> Result<(), Box<dyn std::error::Error>> {
        let s = Tensor2s::<f64, 2>::from_list(&[1.0, 2.0, 3.0])?;
        assert_eq!(serde_json::to_string(&s)?, "[1.0,2.0,3.0]");
        let back: Tensor2s<f64, 2> = serde_json::from_str("[1.0,2.0,3.0]")?;
        assert_eq!(back, s);

        let d = Tensor2d::<f64, 3>::from_array([1.0, 2.0, 3.0]);
        let back: Tensor2d<f64, 3> = serde_json::from_str(&serde_json::to_string(&d)?)?;
        assert_eq!(back, d);
        assert!(serde_json::from_str::<Tensor2s<f64, 3>>("[1.0,2.0,3.0]").is_err());
        Ok(())
    }

    #[test]
    fn test_serde_rejects_wrong_length() {
        let result: Result<Tensor2<f64, 3>, _> = serde_json::from_str("[1.0, 2.0, 3.0, 4.0]");
        assert!(result.is_err());
    }
}
