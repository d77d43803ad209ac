/// Generates one `#[test]` per enabled database for each listed test
/// function. Each function takes `&impl Setup`.
#[macro_export]
macro_rules! tests {
    (@db $feature:literal, $module:ident, $setup:ty; $( $( #[$attrs:meta] )* $f:ident ),+) => {
        #[cfg(feature = $feature)]
        mod $module {
            $(
                #[test]
                $( #[$attrs] )*
                fn $f() {
                    let test = $crate::QuarryTest::new(<$setup>::new());

                    test.run_test(|setup| async move {
                        super::$f(setup).await;
                    });
                }
            )*
        }
    };
    (
        $(
            $( #[$attrs:meta] )*
            $f:ident
        ),+ $(,)?
    ) => {
        $crate::tests!(@db "sqlite", sqlite, $crate::db::sqlite::SetupSqlite; $( $( #[$attrs] )* $f ),+);
        $crate::tests!(@db "postgresql", postgresql, $crate::db::postgresql::SetupPostgreSQL; $( $( #[$attrs] )* $f ),+);
    };
}
