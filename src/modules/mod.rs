pub mod profile {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod repository_memory;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod friend {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod repository_memory;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod follow {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod repository_memory;
    pub mod handle;
    pub mod service;
    pub mod route;
}
