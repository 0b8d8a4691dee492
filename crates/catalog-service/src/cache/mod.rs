//! Caching infrastructure for the service layer.
//!
//! A string-keyed cache abstraction with a pooled Redis implementation, plus
//! the JSON codec and policy used by the product read path.

mod cache_interface;
pub mod cache_keys;
mod policy;
mod product_codec;
mod redis_cache;

pub use cache_interface::CacheInterface;
pub use policy::CachePolicy;
pub use product_codec::{decode_product, encode_product, DeserializationError};
pub use redis_cache::{
    create_redis_pool, spawn_idle_reaper, warm_up, RedisCacheService,
    RedisCacheServiceParameters,
};
