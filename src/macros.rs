/// Implements [Table](crate::database::Table) for a model, binding it to a table name and the field holding its record id.
///
/// ```ignore
/// define_table!("comments" : Comment = id);
/// ```
#[macro_export]
macro_rules! define_table {
    ($table:literal : $model:ty = $id:ident) => {
        impl $crate::database::Table for $model {
            fn id(&self) -> &$crate::database::Thing {
                self.$id.as_ref()
            }

            fn table() -> &'static str {
                $table
            }
        }
    };
}

/// Defines a method to query the database using SQL.
///
/// # Syntax
/// ```ignore
/// [Base Type] > method_name(...arguments) > [Output Type] where "sql query"
/// ```
/// Every argument is bound to the query under its own name, so `video_key` is available as `$video_key`.
/// The generated method takes the [Database](crate::database::Database) as its last argument and returns
/// the first statement of the response deserialized into the output type.
///
/// # Example
///
/// ```ignore
/// define_relation! {
///     Comment > for_video(video_key: &str) > Vec<Comment>
///         where "SELECT * FROM comments WHERE videoKey = $video_key ORDER BY createdAt ASC"
/// }
///
/// let comments = Comment::for_video("intro", &db).await?;
/// ```
#[macro_export]
macro_rules! define_relation {
    ($model:ty > $relation:ident ($($binding:ident : $binding_type:ty),*) > $export:ty where $query:literal) => {
        impl $model {
            #[tracing::instrument(level = "debug", skip(db))]
            pub async fn $relation(
                $($binding : $binding_type ,)*
                db: &$crate::database::Database,
            ) -> ::std::result::Result<$export, $crate::database::DatabaseQueryError> {
                db.sql($query)
                    $(.bind((stringify!($binding), $binding)))*
                    .fetch_first()
                    .await
            }
        }
    };
}
