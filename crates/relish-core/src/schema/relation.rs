mod association_proxy;
pub use association_proxy::AssociationProxy;

mod belongs_to;
pub use belongs_to::BelongsTo;

mod has_many;
pub use has_many::{HasMany, Through};
