pub mod application {
    pub mod cart {
        pub mod repository;
        pub mod scheduler;
        pub mod sync_state;
        pub mod synchronizer;
    }
    pub mod session;
}

pub mod domain {
    pub mod errors;
    pub mod logger;
    pub mod session;
    pub mod cart {
        pub mod connectivity;
        pub mod errors;
        pub mod model;
        pub mod remote;
        pub mod repository;
        pub mod store;
        pub mod sync;
    }
    pub mod shared {
        pub mod clock;
        pub mod value_objects;
    }
}

#[cfg(test)]
pub mod test_support;
