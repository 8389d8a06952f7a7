/// function2 Lambdaエントリポイント
///
/// API Gateway `POST /function2` から呼び出され、
/// `{"message":"This is function2"}` を返却する。
use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    functions::run("function2").await
}
