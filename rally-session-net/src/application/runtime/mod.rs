mod authority_loop;

pub use authority_loop::AuthorityLoop;
