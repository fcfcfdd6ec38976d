use mockall::mock;
use tradepost_engine::{
    db_types::{CheckoutReceipt, NewProduct, NewUser, OrderWithItems, Product, ProductSnapshot, User, UserId},
    traits::{
        CatalogApiError,
        CatalogManagement,
        CheckoutError,
        MarketplaceDatabase,
        OrderApiError,
        OrderManagement,
        UserApiError,
        UserManagement,
    },
};

mock! {
    pub UserStore {}
    impl UserManagement for UserStore {
        async fn create_user(&self, user: NewUser) -> Result<User, UserApiError>;
        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, UserApiError>;
        async fn fetch_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserApiError>;
    }
}

mock! {
    pub Catalog {}
    impl CatalogManagement for Catalog {
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogApiError>;
        async fn fetch_products_for_user(&self, username: &str) -> Result<Vec<Product>, CatalogApiError>;
        async fn delete_product(&self, id: i64, requester: &UserId) -> Result<Product, CatalogApiError>;
    }
}

// The checkout route is bound to the full backend trait, so its mock carries every supertrait.
mock! {
    pub Marketplace {}
    impl Clone for Marketplace {
        fn clone(&self) -> Self;
    }
    impl UserManagement for Marketplace {
        async fn create_user(&self, user: NewUser) -> Result<User, UserApiError>;
        async fn fetch_user_by_username(&self, username: &str) -> Result<Option<User>, UserApiError>;
        async fn fetch_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserApiError>;
    }
    impl CatalogManagement for Marketplace {
        async fn insert_product(&self, product: NewProduct) -> Result<Product, CatalogApiError>;
        async fn fetch_product(&self, id: i64) -> Result<Option<Product>, CatalogApiError>;
        async fn fetch_all_products(&self) -> Result<Vec<Product>, CatalogApiError>;
        async fn fetch_products_for_user(&self, username: &str) -> Result<Vec<Product>, CatalogApiError>;
        async fn delete_product(&self, id: i64, requester: &UserId) -> Result<Product, CatalogApiError>;
    }
    impl OrderManagement for Marketplace {
        async fn fetch_orders_for_user(&self, user_id: &UserId) -> Result<Vec<OrderWithItems>, OrderApiError>;
    }
    impl MarketplaceDatabase for Marketplace {
        fn url(&self) -> &str;
        async fn checkout(
            &self,
            buyer_id: &UserId,
            entries: &[ProductSnapshot],
        ) -> Result<CheckoutReceipt, CheckoutError>;
        async fn close(&mut self) -> Result<(), CheckoutError>;
    }
}
