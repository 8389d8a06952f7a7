/// function1 Lambdaエントリポイント
///
/// API Gateway `POST /function1` から呼び出され、
/// `{"message":"This is function1"}` を返却する。
use lambda_runtime::Error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    functions::run("function1").await
}
